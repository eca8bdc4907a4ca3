pub mod data;
pub mod settings;
pub mod window;

pub use data::{BatchSummary, RawValue, TagWriteRequest};
pub use settings::{HourRule, PeriodSettings, ShiftDef, ShiftStart, ShiftStartError};
pub use window::{ResolvedWindow, SchemaKind, WindowKind, WindowKindParseError};
