// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(dead_code)]
#![allow(rustdoc::private_intra_doc_links)]

//! Tribus is a family of chainable bus-mixer modules for voltage-style
//! modular synthesis hosts. Three stereo buses ride a shared six-channel
//! cable from module to module; each strip adds its (mono or stereo) input
//! onto the buses, and a master module applies the final level and fade,
//! folds in an auxiliary input, and sums the buses down to stereo.
//!
//! The host owns the ports and knobs; each module's core implements
//! [BusModule](crate::traits::BusModule) and does all its work inside
//! `process()`, one audio frame at a time.

/// A collection of imports that are useful to users of this crate. `use
/// tribus::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        cores::{
            CompactStripCore, CompactStripCoreBuilder, MasterCore, MasterCoreBuilder,
            MiniStripCore, MiniStripCoreBuilder, StereoStripCore, StereoStripCoreBuilder,
            METER_SEGMENTS,
        },
        elements::{
            AutoFader, ClockDivider, ConstantPan, PeakHold, SchmittTrigger, Slewer, VuMeter,
        },
        host::{InputPort, Light, OutputPort, BUS_CHANNELS, MAX_CHANNELS, STEREO_BUS_COUNT},
        traits::{BusModule, Configurable, Configurables, HasSettings, Serializable},
        types::{ColorTheme, FadeCvMode, MixerError, SampleRate},
        util::MixerSettings,
    };
}

pub mod cores;
pub mod elements;
pub mod host;
pub mod traits;
pub mod types;
pub mod util;
