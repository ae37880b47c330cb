// Fri Jan 23 2026 - Alex

pub mod apimonitor;
pub mod element;
pub mod error;
pub mod registry;
pub mod winapioverride;

pub use apimonitor::ApiMonitorEmitter;
pub use element::Element;
pub use error::EmitError;
pub use registry::{ClaimedName, NameRegistry};
pub use winapioverride::{EmitSummary, WinApiOverrideEmitter};
