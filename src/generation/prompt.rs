use super::GenerationParams;

pub const SYSTEM_PROMPT: &str = "You are an expert video generation AI assistant. Create high-quality, visually engaging videos based on user prompts. Focus on:

1. Professional cinematography with smooth camera movements
2. Rich visual details and atmospheric lighting
3. Coherent storytelling and scene composition
4. Natural motion and realistic physics
5. Appropriate pacing for the specified duration
6. High production value and visual appeal

Generate videos that are suitable for professional and creative use cases. Avoid any inappropriate, violent, or explicit content.";

/// Display-only description of the assistant's guidelines. Not sent to the provider.
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Instruction sent to the provider as the single user message.
pub fn enhance(params: &GenerationParams) -> String {
    format!(
        "Generate a high-quality video: {}.\n\
         Duration: {} seconds, Aspect ratio: {}, Quality: {}.\n\
         Create a visually engaging video with smooth transitions and professional cinematography.",
        params.prompt, params.duration, params.aspect_ratio, params.quality
    )
}
