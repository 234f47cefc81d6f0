//! Fenced block directives.
//!
//! A directive is a fenced block whose info string is `{name}`:
//!
//! ````markdown
//! ::::{tab-set}
//! :::{tab-item} Python
//! :sync: py
//! ```{code-block} python
//! print("hi")
//! ```
//! :::
//! ::::
//! ````
//!
//! Colon and backtick fences are interchangeable. A block closes at the
//! first fence with the same character and length once every nested block
//! of that shape is closed, so identical fences nest.
//!
//! # Architecture
//!
//! [`DirectiveEngine`] scans lines, splits each block into argument,
//! options and body, renders nested directives in the body and hands the
//! resulting [`DirectiveNode`] to the [`BlockDirective`] registered for the
//! name. Handlers return a [`DirectiveOutput`]; shared state such as
//! counters lives in [`DirectiveContext`].

mod context;
mod engine;
mod handler;
mod handlers;
mod node;
mod output;

pub use context::{DirectiveContext, TabItem};
pub use engine::{DEFAULT_MAX_DEPTH, DirectiveEngine};
pub use handler::BlockDirective;
pub use handlers::{
    Admonition, Card, Code, Dropdown, Exercise, Glossary, Grid, GridItem, GridItemCard, Iframe,
    Mermaid, Proof, Solution, TabItemDirective, TabSet, Video, VideoCompare,
};
pub use node::{DirectiveNode, DirectiveOptions};
pub(crate) use node::split_options;
pub use output::DirectiveOutput;
