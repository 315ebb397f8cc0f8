// src/lib.rs
//! Announces Minecraft servers managed by Crafty Controller on the LAN.
//!
//! The [`reconciler`] polls the manager through the [`crafty`] client and, for
//! every running server, sends a LAN discovery datagram built by
//! [`broadcast`]. Each cycle leaves a heartbeat in [`storage::memory`], which
//! the [`handlers`] dashboard serves.
pub mod broadcast;
pub mod config;
pub mod crafty;
pub mod handlers;
pub mod models;
pub mod reconciler;
pub mod storage;
pub mod utils;
