//! Optimistic view-state synchronization for a remote to-do list.
//!
//! # Overview
//! `SyncCore` owns everything a to-do UI renders: the filtered list, the
//! optimistic placeholder for a create in flight, the ids being deleted, the
//! active filter, counters and a single transient error. User intents apply
//! optimistic state immediately and run their gateway call in the
//! background; every settled call bumps a request epoch, and a refresh
//! scheduler re-derives the view from the service's authoritative list.
//!
//! # Design
//! - `TodoGateway` and `SessionProvider` are the seams to the outside world.
//! - `TodoClient` stays stateless and I/O free: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`. `HttpGateway`
//!   executes them with reqwest.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod http;
pub mod session;
pub mod sync;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use filter::select;
pub use gateway::{HttpGateway, TodoGateway};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{Session, SessionProvider};
pub use sync::{RefreshTrigger, SyncConfig, SyncCore, ViewSnapshot, DEFAULT_ERROR_TIMEOUT};
pub use types::{CreateTodo, ErrorKind, FilterMode, Todo, TodoId, User, UserId, PLACEHOLDER_ID};
