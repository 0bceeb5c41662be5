//! ファサードのコアモジュール群

pub mod controller;
pub mod iframe;
pub mod loader;
pub mod modal;
pub mod player;
pub mod resolver;
pub mod warmer;
