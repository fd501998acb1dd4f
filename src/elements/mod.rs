// Copyright (c) 2024 Mike Tsao

//! Reusable per-sample DSP building blocks shared by the module cores.

pub use {
    faders::{AutoFader, Slewer},
    meters::{PeakHold, VuMeter},
    panners::ConstantPan,
    timing::ClockDivider,
    triggers::SchmittTrigger,
};

mod faders;
mod meters;
mod panners;
mod timing;
mod triggers;
