// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Resize Simulation Use Case
//!
//! Drives a [`StatelessResize`] or [`EventDrivenResize`] over a scripted
//! sequence of port events and records the verdict trace, for manually
//! exercising either scheduling variant without a real dataflow graph
//! around it.

use crate::infrastructure::adapters::resize_script::ScriptEvent;
use crate::infrastructure::runtime::channel_port;
use anyhow::{bail, Result};
use partcheck_domain::entities::{InputPort, OutputPort};
use partcheck_domain::value_objects::Chunk;
use partcheck_domain::{EventDrivenResize, StatelessResize};
use std::sync::Arc;
use tracing::debug;

use crate::application::commands::{ResizeSimCommand, ResizeSimResult, ResizeSimStep};

enum Scheduler {
    Stateless(StatelessResize),
    EventDriven(EventDrivenResize),
}

pub struct ResizeSimUseCase;

impl ResizeSimUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, command: &ResizeSimCommand) -> Result<ResizeSimResult> {
        if command.num_inputs == 0 && command.num_outputs == 0 {
            bail!("resize-sim needs at least one input or output port");
        }

        // `upstream`/`downstream` are the simulation harness's own ends of
        // each channel; `dyn_inputs`/`dyn_outputs` are the ends Resize owns.
        let mut upstream = Vec::with_capacity(command.num_inputs);
        let mut dyn_inputs: Vec<Arc<dyn InputPort>> = Vec::with_capacity(command.num_inputs);
        for _ in 0..command.num_inputs {
            let (input, output) = channel_port::channel();
            dyn_inputs.push(input);
            upstream.push(output);
        }

        let mut downstream = Vec::with_capacity(command.num_outputs);
        let mut dyn_outputs: Vec<Arc<dyn OutputPort>> = Vec::with_capacity(command.num_outputs);
        for _ in 0..command.num_outputs {
            let (input, output) = channel_port::channel();
            dyn_outputs.push(output);
            downstream.push(input);
        }

        let mut scheduler = if command.event_driven {
            Scheduler::EventDriven(EventDrivenResize::new(dyn_inputs, dyn_outputs))
        } else {
            Scheduler::Stateless(StatelessResize::new(dyn_inputs, dyn_outputs))
        };

        let mut dirty_inputs = Vec::new();
        let mut dirty_outputs = Vec::new();
        let mut steps = Vec::new();

        for event in &command.script {
            match event {
                ScriptEvent::Fill { index, data } => {
                    let output = get(&upstream, *index, "input")?;
                    output.push(Chunk::new(data.clone()));
                    dirty_inputs.push(*index);
                    steps.push(ResizeSimStep::Filled { index: *index, bytes: data.len() });
                }
                ScriptEvent::Finish { index } => {
                    let output = get(&upstream, *index, "input")?;
                    output.mark_upstream_finished();
                    dirty_inputs.push(*index);
                    steps.push(ResizeSimStep::Finished { index: *index });
                }
                ScriptEvent::Drain { index } => {
                    let input = get(&downstream, *index, "output")?;
                    let chunk = input.pull();
                    dirty_outputs.push(*index);
                    steps.push(ResizeSimStep::Drained {
                        index: *index,
                        chunk: chunk.map(Chunk::into_bytes),
                    });
                }
                ScriptEvent::Prepare => {
                    let verdict = match &mut scheduler {
                        Scheduler::Stateless(resize) => resize.prepare(),
                        Scheduler::EventDriven(resize) => {
                            let verdict = resize.prepare(&dirty_inputs, &dirty_outputs);
                            dirty_inputs.clear();
                            dirty_outputs.clear();
                            verdict
                        }
                    };
                    debug!(?verdict, "resize-sim prepare");
                    steps.push(ResizeSimStep::Prepared { verdict });
                }
            }
        }

        Ok(ResizeSimResult { steps })
    }
}

impl Default for ResizeSimUseCase {
    fn default() -> Self {
        Self::new()
    }
}

fn get<'a, T>(ports: &'a [Arc<T>], index: usize, side: &str) -> Result<&'a Arc<T>> {
    ports
        .get(index)
        .ok_or_else(|| anyhow::anyhow!("script references {side} port {index}, but only {} exist", ports.len()))
}
