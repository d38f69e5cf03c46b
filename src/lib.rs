#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

pub mod constants;
pub mod logging;
pub mod feed;
pub mod geometry;
pub mod models;
pub mod scroll;
pub mod stores;
pub mod theme;
pub mod time;
pub mod tracker;
pub mod view_model;

pub use stores::Stores;
pub use view_model::SelectedLineViewModel;
