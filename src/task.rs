//! Coursework task presets
//!
//! Four classification tasks over two image corpora: gender and smiling
//! detection on celebrity photographs, face shape and eye color on cartoon
//! avatars. Each preset carries the input shape and class count a
//! [`TrainConfig`](crate::train::TrainConfig) needs.

use serde::{Deserialize, Serialize};

/// One classification task: its label column and input geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Task name, matching the label column in the corpus manifest
    pub name: String,
    /// Input image height
    pub height: usize,
    /// Input image width
    pub width: usize,
    /// Number of label classes
    pub num_classes: usize,
}

impl TaskSpec {
    /// Binary gender classification on celebrity photographs
    pub fn gender() -> Self {
        Self { name: "gender".to_string(), height: 218, width: 178, num_classes: 2 }
    }

    /// Binary smiling detection on celebrity photographs
    pub fn smiling() -> Self {
        Self { name: "smiling".to_string(), height: 218, width: 178, num_classes: 2 }
    }

    /// Five-way face shape classification on cartoon avatars
    pub fn face_shape() -> Self {
        Self { name: "face_shape".to_string(), height: 500, width: 500, num_classes: 5 }
    }

    /// Five-way eye color classification on cartoon avatars
    pub fn eye_color() -> Self {
        Self { name: "eye_color".to_string(), height: 500, width: 500, num_classes: 5 }
    }

    /// All four tasks, in coursework order
    pub fn all() -> Vec<Self> {
        vec![Self::gender(), Self::smiling(), Self::face_shape(), Self::eye_color()]
    }
}
