// Copyright (c) 2024 Mike Tsao

//! The four mixer module variants. Each core owns its DSP state and its host
//! boundary (params, ports, lights), and implements the shared per-frame bus
//! algorithm: trigger detection, fader/smoother update, throttled pan
//! recomputation, gain staging, and additive summing onto the three stereo
//! buses.

pub use {
    compact::{
        CompactStripCore, CompactStripCoreBuilder, CompactStripInputs, CompactStripLights,
        CompactStripOutputs, CompactStripParams,
    },
    master::{
        MasterCore, MasterCoreBuilder, MasterInputs, MasterLights, MasterOutputs, MasterParams,
        METER_SEGMENTS,
    },
    mini::{
        MiniStripCore, MiniStripCoreBuilder, MiniStripInputs, MiniStripLights, MiniStripOutputs,
        MiniStripParams,
    },
    stereo::{
        StereoStripCore, StereoStripCoreBuilder, StereoStripInputs, StereoStripLights,
        StereoStripOutputs, StereoStripParams,
    },
};

mod compact;
mod master;
mod mini;
mod stereo;
