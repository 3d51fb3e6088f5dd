use crate::collision::RaycastProbe;
use crate::geometry::{Ray, Vec3};
use crate::geometry_registry::ObjectId;
use crate::particle_world::WorldStats;
use crate::particle_system::SystemId;
use crate::render::{BufferKind, DirtyTracker};
use crate::scene::{ModelKind, SceneEditor};
use crate::sim_params::SimParams;
use log::{debug, warn};
use rand::SeedableRng;

// Editor input, produced by whatever drives the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    Add { kind: ModelKind, position: [f32; 3] },
    Move { id: ObjectId, position: [f32; 3] },
    Delete { id: ObjectId },
    // Delete whatever model is under the ray (a click in the viewport).
    DeleteAt { origin: [f32; 3], direction: [f32; 3] },
}

// Runs the simulation. Commands may be sent from any thread; they are applied
// on the tick thread at the start of the next tick, so every buffer mutation
// happens here.
pub struct SimulationHost {
    editor: SceneEditor,
    probe: RaycastProbe,
    sink: DirtyTracker,
    rng: rand::rngs::StdRng,
    command_tx: crossbeam_channel::Sender<SceneCommand>,
    command_rx: crossbeam_channel::Receiver<SceneCommand>,
    added: Vec<ObjectId>,
    ticks: u64,
}

impl SimulationHost {
    pub fn new(params: &SimParams) -> Self {
        let rng = match params.seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        };
        let (command_tx, command_rx) = crossbeam_channel::unbounded::<SceneCommand>();
        SimulationHost {
            editor: SceneEditor::new(params),
            probe: RaycastProbe::default(),
            sink: DirtyTracker::new(),
            rng,
            command_tx,
            command_rx,
            added: vec![],
            ticks: 0,
        }
    }

    pub fn sender(&self) -> crossbeam_channel::Sender<SceneCommand> {
        self.command_tx.clone()
    }

    pub fn editor(&self) -> &SceneEditor {
        &self.editor
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    // Ids of the models added through commands, in order.
    pub fn added(&self) -> &[ObjectId] {
        &self.added
    }

    // Buffers the renderer has to re-upload.
    pub fn take_modified(&mut self) -> Vec<(SystemId, BufferKind)> {
        self.sink.take_modified()
    }

    fn apply(&mut self, command: SceneCommand) {
        debug!("Applying {:?}", command);
        match command {
            SceneCommand::Add { kind, position } => {
                let id = self.editor.add_object(kind, position.into(), &mut self.rng);
                self.added.push(id);
            }
            SceneCommand::Move { id, position } => {
                self.editor.move_object(id, position.into());
            }
            SceneCommand::Delete { id } => {
                self.editor.delete_object(id);
            }
            SceneCommand::DeleteAt { origin, direction } => {
                match Ray::along(origin.into(), Vec3::from(direction)) {
                    Some(ray) => {
                        if self.editor.delete_at(&ray, &self.probe).is_none() {
                            debug!("Nothing to delete under {:?}", ray);
                        }
                    }
                    None => warn!("Ignoring delete with zero direction"),
                }
            }
        }
    }

    // Applies queued commands, then advances both particle classes by one tick.
    pub fn tick(&mut self) -> WorldStats {
        while let Ok(command) = self.command_rx.try_recv() {
            self.apply(command);
        }
        self.ticks += 1;
        self.editor.update(&self.probe, &mut self.sink, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::EmitterClass;

    fn host() -> SimulationHost {
        let params = SimParams {
            seed: Some(9),
            ..SimParams::default()
        };
        SimulationHost::new(&params)
    }

    #[test]
    fn commands_apply_on_next_tick() {
        let mut host = host();
        let tx = host.sender();
        tx.send(SceneCommand::Add {
            kind: ModelKind::Rack,
            position: [2.0, 0.0, 0.0],
        })
        .unwrap();
        assert!(host.added().is_empty());
        let stats = host.tick();
        assert_eq!(host.added().len(), 1);
        assert_eq!(stats.rack.systems, 1);
        assert_eq!(host.ticks(), 1);
        assert_eq!(host.take_modified().len(), 3);
        assert!(host.take_modified().is_empty());
    }

    #[test]
    fn commands_from_another_thread() {
        let mut host = host();
        let tx = host.sender();
        std::thread::spawn(move || {
            tx.send(SceneCommand::Add {
                kind: ModelKind::Cooler,
                position: [-3.0, 0.0, 0.0],
            })
            .unwrap();
        })
        .join()
        .unwrap();
        let stats = host.tick();
        assert_eq!(stats.cooler.systems, 1);
    }

    #[test]
    fn delete_commands_remove_particles() {
        let mut host = host();
        let tx = host.sender();
        tx.send(SceneCommand::Add {
            kind: ModelKind::Rack,
            position: [2.0, 0.0, 0.0],
        })
        .unwrap();
        tx.send(SceneCommand::Add {
            kind: ModelKind::Cooler,
            position: [-3.0, 0.0, 0.0],
        })
        .unwrap();
        host.tick();
        let rack = host.added()[0];
        let cooler = host.added()[1];

        tx.send(SceneCommand::DeleteAt {
            origin: [2.0, 10.0, 0.0],
            direction: [0.0, -1.0, 0.0],
        })
        .unwrap();
        tx.send(SceneCommand::Move {
            id: cooler,
            position: [-2.0, 0.0, 1.0],
        })
        .unwrap();
        let stats = host.tick();
        assert_eq!(stats.rack.systems, 0);
        assert!(host.editor().registry().model(rack).is_none());
        assert_eq!(
            host.editor().registry().model(cooler).unwrap().transform.position,
            Vec3::new(-2.0, 0.0, 1.0)
        );

        tx.send(SceneCommand::Delete { id: cooler }).unwrap();
        host.tick();
        assert!(host.editor().world().store(EmitterClass::Cooler).is_empty());
    }
}
