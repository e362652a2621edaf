#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod board;
pub mod clock;
pub mod editor;
pub mod firmware;
pub mod input;
pub mod menu;
pub mod power;
pub mod render;
pub mod retained;
pub mod sensors;
pub mod wake;
pub mod weather;
