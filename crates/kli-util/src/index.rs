//! Index aliases used as registry handles and packed token fields.
//!
//! These are plain aliases rather than newtypes: every one of them is
//! copied raw into the packed [`Token`](crate::Token) header or used to
//! address a registry slot, and the widths are part of the on-wire
//! layout.

/// Handle of a registered directory. Stable and monotonically increasing.
pub type DirectoryIndex = u32;

/// Handle of a registered file. Stable and monotonically increasing.
pub type FileIndex = u16;

/// One-based source line.
pub type LineIndex = u16;

/// One-based source column.
pub type ColumnIndex = u16;
