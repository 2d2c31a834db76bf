//! Action dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! POST request (urlencoded or multipart body)
//!     → form.rs (parse body into FormData)
//!     → caller.rs (read action field, build synthetic path)
//!     → routing (tree → matches → single frame)
//!     → handler.rs (invoke the resolved route's handler)
//! ```
//!
//! # Design Decisions
//! - Every failure is returned to the caller, nothing is logged and dropped
//! - Collaborator errors (manifest, form, handler) surface unchanged
//! - Collaborators are injected as trait objects so tests can swap them

pub mod caller;
pub mod error;
pub mod form;
pub mod handler;

pub use caller::{ActionCaller, ActionCallerConfig, CallArgs};
pub use error::ActionError;
pub use form::{
    FormData, FormDataParser, FormError, FormFile, FormValue, HtmlFormParser, UrlEncodedFormParser,
};
pub use handler::{ActionArgs, ActionHandler, HandlerError, HandlerResult, Params, SharedHandler};
