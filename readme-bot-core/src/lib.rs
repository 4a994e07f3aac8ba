#![doc = "readme-bot-core: core logic library for readme-bot."]

//! This crate holds the data model, collaborator traits and the update pipeline.
//! It performs no I/O of its own: the GitHub and Gemini clients live in the
//! `readme-bot` binary crate and plug in through the traits in [`contract`].
//!
//! # Usage
//! Build an [`config::UpdateConfig`] and a [`event::TriggerEvent`], then call
//! [`synchronise::synchronise`] with a [`contract::SourceHost`] and a
//! [`contract::ContentGenerator`].

pub mod changeset;
pub mod config;
pub mod contract;
pub mod event;
pub mod prompt;
pub mod synchronise;
