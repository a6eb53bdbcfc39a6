//! Retired branch descriptor.
//!
//! The surrounding simulator reports every retired control-flow instruction
//! with a handful of class flags. Only `conditional` influences the direction
//! predictors; the remaining flags are carried so a host can hand over the
//! record it already has without filtering it first.

/// Class flags and target of a retired branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BranchInfo {
    /// Resolved target address.
    pub target: u64,
    /// Conditional branch (the only class that trains the predictor).
    pub conditional: bool,
    /// Call instruction.
    pub call: bool,
    /// Return instruction.
    pub ret: bool,
    /// Direct (PC-relative) control transfer.
    pub direct: bool,
}

impl BranchInfo {
    /// Describes a direct conditional branch to `target`.
    pub const fn conditional(target: u64) -> Self {
        Self {
            target,
            conditional: true,
            call: false,
            ret: false,
            direct: true,
        }
    }

    /// Describes a direct unconditional jump to `target`.
    pub const fn jump(target: u64) -> Self {
        Self {
            target,
            conditional: false,
            call: false,
            ret: false,
            direct: true,
        }
    }

    /// Describes a direct call to `target`.
    pub const fn call(target: u64) -> Self {
        Self {
            target,
            conditional: false,
            call: true,
            ret: false,
            direct: true,
        }
    }

    /// Describes an indirect return to `target`.
    pub const fn ret(target: u64) -> Self {
        Self {
            target,
            conditional: false,
            call: false,
            ret: true,
            direct: false,
        }
    }
}
