//! Domain models for agntx
//!
//! Plain value types shared by discovery, installation, the manifest store
//! and the validator. Nothing here touches the filesystem.

pub mod component;
pub mod issue;

pub use component::{ComponentKind, InstallMode, Scope, Tool};
pub use issue::{Issue, IssueCode, Severity};
