//! Starter prompts offered to new users.

use rand::seq::SliceRandom;

pub const POPULAR_PROMPTS: [&str; 10] = [
    "A futuristic city with flying cars at sunset, cyberpunk style",
    "A serene Japanese garden with cherry blossoms falling, 8k resolution",
    "Portrait of a robot mechanic fixing a vintage car, detailed digital art",
    "A magical forest with glowing mushrooms and fairy lights, fantasy concept art",
    "An astronaut floating in a nebula, cinematic lighting, photorealistic",
    "Isometric view of a cozy coffee shop interior, low poly style",
    "A steampunk airship navigating through stormy clouds, oil painting style",
    "Minimalist landscape of sand dunes under a starry night sky",
    "A cute baby dragon sleeping on a pile of treasure, 3d render, pixar style",
    "Abstract geometric patterns with neon colors, 4k wallpaper",
];

/// One prompt picked at random.
pub fn random_prompt() -> &'static str {
    POPULAR_PROMPTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(POPULAR_PROMPTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_prompt_is_known() {
        let prompt = random_prompt();
        assert!(POPULAR_PROMPTS.contains(&prompt));
    }
}
