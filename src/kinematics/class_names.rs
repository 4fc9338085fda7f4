//! Class id to label lookup.

use std::collections::BTreeMap;

/// Label used for class ids missing from the table.
pub const UNKNOWN_CLASS: &str = "Unknown";

/// The 80 COCO labels in model output order, as emitted by YOLO-family detectors.
pub const COCO_CLASSES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich",
    "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch",
    "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote",
    "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator", "book",
    "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

/// Mapping from detector class id to human readable label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassNames {
    names: BTreeMap<i64, String>,
}

impl ClassNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels for detectors trained on COCO.
    pub fn coco() -> Self {
        COCO_CLASSES
            .iter()
            .enumerate()
            .map(|(id, name)| (id as i64, *name))
            .collect()
    }

    pub fn insert(&mut self, class_id: i64, label: impl Into<String>) {
        self.names.insert(class_id, label.into());
    }

    /// Label for `class_id`, or [`UNKNOWN_CLASS`] if it is not in the table.
    pub fn label(&self, class_id: i64) -> &str {
        self.names
            .get(&class_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CLASS)
    }

    /// All known labels, in class id order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.names.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(i64, S)> for ClassNames {
    fn from_iter<I: IntoIterator<Item = (i64, S)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|(id, name)| (id, name.into())).collect(),
        }
    }
}
