//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the collaborator contracts the engine consumes. The market core
//! never talks to a concrete ledger, clock, oracle or event sink; adapters
//! implement these traits and are injected at construction.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  Registry + Settlement  │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                   │             │                     │
//!     ▼                   ▼             ▼                     ▼
//! ┌─────────┐       ┌──────────┐  ┌──────────┐          ┌───────────┐
//! │ Ledger  │       │  Clock   │  │  Oracle  │          │ Notifier  │
//! │ Adapter │       │ Adapter  │  │ Adapter  │          │  Adapter  │
//! └─────────┘       └──────────┘  └──────────┘          └───────────┘
//! ```

pub mod outbound;

pub use outbound::clock::Clock;
pub use outbound::ledger::{Ledger, LedgerError};
pub use outbound::notifier::{Notifier, NotifierRegistry, NullNotifier};
pub use outbound::oracle::{OracleError, PriceOracle};
