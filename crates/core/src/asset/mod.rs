//! Asset layer - catalog, reference collection and resolution.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────────────┐
//! │   DataScanner    │────▶│  ReferenceCollector │
//! │ (project data)   │     │  (type, name) set   │
//! └──────────────────┘     └──────────┬──────────┘
//!                                     │
//!                                     ▼
//!  ┌──────────────┐        ┌─────────────────────┐
//!  │ AssetCatalog │───────▶│    AssetResolver    │──▶ MigrationOutcome
//!  │ folder + ext │        │ project ▸ runtime   │
//!  └──────────────┘        └─────────────────────┘
//! ```

pub mod catalog;
pub mod collector;
pub mod resolver;

pub use catalog::{AssetCatalog, AssetType, AssetTypeDescriptor, ExtensionClass};
pub use collector::{AssetReference, ReferenceCollector};
pub use resolver::{AssetResolver, MigrationOutcome, Resolution};
