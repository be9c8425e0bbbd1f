//! Tessel Engine
//!
//! Owns a document, its stylesheets and a render backend, and turns the
//! mutations made between frames into one command buffer per tick.
//!
//! # Example
//! ```rust,ignore
//! use tessel_engine::{Config, Page};
//!
//! let mut page = Page::new(Config::default());
//! page.load_html("<div style=\"width: 10px\">hi</div>")?;
//! page.tick();
//! ```

mod config;
mod error;
mod page;
mod reconciler;
mod resources;
mod scripts;

pub use config::Config;
pub use error::{EngineError, EngineResult};
pub use page::{LoadReport, Page};
pub use reconciler::{Reconciler, TickOutput, TickStats};
pub use resources::{FileProvider, FsFileProvider, MemoryFileProvider, resolve_path};
pub use scripts::{ScriptEngine, ScriptReport, ScriptRunner};

// Re-export sub-crates for hosts
pub use tessel_css as css;
pub use tessel_dom as dom;
pub use tessel_html as html;
pub use tessel_layout as layout;
pub use tessel_render as render;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
