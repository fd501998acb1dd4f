// Copyright (c) 2024 Mike Tsao

//! Utilities that don't fit anywhere else.

pub use settings::MixerSettings;

mod settings;
