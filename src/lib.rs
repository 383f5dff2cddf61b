//! envv - team secrets sync with client-side encryption.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── auth          # register / login / logout / whoami
//! │   ├── org, project  # organization and project collaborators
//! │   ├── init, status  # project binding
//! │   └── secrets       # push / pull / sync / list / rotate / rollback
//! └── core/             # Core library components
//!     ├── config        # settings, session, project binding
//!     ├── directory     # recipient directory trait
//!     ├── policy        # encryption policy builder
//!     ├── cipher/       # encryption engines (age, sops)
//!     ├── store         # secret version store trait
//!     ├── api/          # remote service client
//!     ├── scratch       # scoped temporary storage
//!     └── workflow/     # push / pull / sync and rotation orchestration
//! ```
//!
//! Secrets are always encrypted before they leave the machine, addressed to
//! every project member holding a registered age public key.

pub mod cli;
pub mod core;
pub mod error;
