mod bbox;
mod class_names;
mod config;
mod frame_processor;
mod object;
mod registry;
mod report;
mod speed;
mod track_state;

pub use bbox::PixelBox;
pub use class_names::{COCO_CLASSES, ClassNames, UNKNOWN_CLASS};
pub use config::{AnalyserConfig, ConfigError};
pub use frame_processor::FrameProcessor;
pub use object::{AnnotatedObject, RECORD_FIELDS, TrackedObject};
pub use registry::{TrackRegistry, TrackUpdate};
pub use report::{
    ObjectSummary, Report, ReportAggregator, SessionMetadata, TrackedObjectReport, round2,
};
pub use speed::{DEFAULT_MAX_FRAME_GAP, KPH_PER_MPS, SpeedEstimator, estimate};
pub use track_state::{History, HistoryPoint, TrackState};
