//! Model-View-Intent (MVI) primitives for the screen state machines.
//!
//! ```text
//! Intent ──→ Reducer ──→ StateCell ──→ View
//!    ↑          │                        │
//!    │          └──→ EffectQueue ──→─────┤
//!    └───────────────────────────────────┘
//! ```
//!
//! - **State**: immutable snapshot, published through a [`StateCell`]
//! - **Intent**: user actions posted to a screen
//! - **Reducer**: pure `(state, mutation) -> state`
//! - **Effect**: one-shot signal delivered through an [`EffectQueue`]
//! - **Scope**: per-screen lifetime; work launched in it dies at teardown

mod effect;
mod intent;
mod reducer;
mod scope;
mod state;

pub use effect::EffectQueue;
pub use intent::Intent;
pub use reducer::Reducer;
pub use scope::ScreenScope;
pub use state::{StateCell, UiState};
