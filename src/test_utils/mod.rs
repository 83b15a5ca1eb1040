#![allow(missing_docs)]

pub(crate) mod html;
mod store;

pub(crate) use html::{assert_valid_html, parse_html_fragment};
pub(crate) use store::{FailingStore, must_create_transaction, spawn_api, test_server};
