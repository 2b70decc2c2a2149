//! WrapMirror - static mirror of the Meson WrapDB API
//!
//! This library fetches the WrapDB project catalog, every project's version
//! list, and every version's wrap descriptor and patch archive, and lays them
//! out as plain files that a static web server can serve under the original
//! endpoint paths.
//!
//! # Modules
//!
//! - [`layout`]: API address to filesystem path mapping
//! - [`wrap`]: wrap descriptor parsing
//! - [`checksum`]: SHA-256 archive verification
//! - [`fetch`]: transport abstraction and the HTTP implementation
//! - [`api`]: upstream JSON documents and endpoint URLs
//! - [`mirror`]: the traversal driving all of the above
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use wrapmirror::mirror::{Mirror, MirrorConfig};
//!
//! let config = MirrorConfig::new(PathBuf::from("/srv/wrapdb"));
//! let report = Mirror::from_config(&config)?.run()?;
//! println!("{}", report);
//! # Ok::<(), wrapmirror::MirrorError>(())
//! ```

pub mod api;
pub mod checksum;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod logging;
pub mod mirror;
pub mod wrap;

pub use error::{MirrorError, MirrorResult};
