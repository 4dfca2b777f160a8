use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Canned suggestions used when the upstream API is skipped or unavailable
pub const MOCK_RESPONSES: [&str; 6] = [
    "Try taking a relaxing walk in nature and listen to 'Tum Jo Aaye Zindagi Mein' by Jagjit Singh 🌿 This peaceful melody will calm your mind.",
    "Consider practicing some light yoga or meditation, then enjoy 'Raag Yaman' by Ravi Shankar 🧘 The meditative tones will help you find inner peace.",
    "Go spend time with friends or family and listen to 'Dil Dhadakne Do' by Rahul Vaidya 🎉 This uplifting song will boost your mood instantly.",
    "Try journaling your thoughts and play 'Sukoon' by AR Rahman 🎵 This soothing track will help you process your emotions beautifully.",
    "Take a break and enjoy some chai with 'Baarish Ban Jaana' by B Praak 🌧️ This melancholic yet comforting song is perfect for peaceful moments.",
    "Do something creative like painting or writing, then listen to 'Aashian' by Sunidhi Chauhan 🎨 This melodious song will inspire your creativity.",
];

/// Chooses an index in `0..len`. `len` is never zero.
pub trait Picker: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Uniform pick from the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl Picker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Uniform pick from a seeded RNG, reproducible across runs
#[derive(Debug)]
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Picker for SeededPicker {
    fn pick(&self, len: usize) -> usize {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..len),
            Err(poisoned) => poisoned.into_inner().gen_range(0..len),
        }
    }
}

/// Always returns the same index (clamped into range)
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl Picker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}

/// Immutable, ordered pool of fallback suggestions
#[derive(Clone)]
pub struct MockPool {
    responses: Arc<[String]>,
    picker: Arc<dyn Picker>,
}

impl MockPool {
    /// The built-in pool with a uniformly random picker
    pub fn new() -> Self {
        Self::with_picker(Arc::new(RandomPicker))
    }

    pub fn with_picker(picker: Arc<dyn Picker>) -> Self {
        Self {
            responses: MOCK_RESPONSES.iter().map(|s| s.to_string()).collect(),
            picker,
        }
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    pub fn contains(&self, text: &str) -> bool {
        self.responses.iter().any(|r| r == text)
    }

    pub fn pick(&self) -> String {
        let idx = self.picker.pick(self.responses.len());
        self.responses[idx].clone()
    }
}

impl Default for MockPool {
    fn default() -> Self {
        Self::new()
    }
}
