// Wed Jan 21 2026 - Alex

pub mod error;
pub mod expander;

pub use error::ExpandError;
pub use expander::{
    render_aggregate, render_enum, render_field, render_function, render_typedef,
};
