//! Fixed-tick controller loop.
//!
//! Each tick walks the Reading → Applying → Publishing phases: poll the
//! encoder pins and drain queued network commands, feed the value store,
//! recompute and apply the drive levels when dirty, hand changes to the
//! debounced persistence layer, then publish a state report if anything
//! changed. The loop is the only owner of the value store, so no locking is
//! needed around it.
//!
//! Timing is caller-driven like the rest of the crate: the embedding
//! firmware calls [`Controller::tick`] with the current instant and sleeps
//! until the returned deadline.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;
use embedded_storage::Storage;
use heapless::Vec;

use crate::channel::{Channel, Receiver, Sender};
use crate::command::{Command, Report, StateReport};
use crate::config::ControlConfig;
use crate::encoder::EncoderPair;
use crate::output::{MixInput, OutputStage};
use crate::persist::PersistenceService;
use crate::store::{ControlId, ValueStore};

/// Queue for validated inbound commands.
pub type CommandChannel<const SIZE: usize> = Channel<Command, SIZE>;

/// Producer side handed to the network callback.
pub type CommandSender<'a, const SIZE: usize> = Sender<'a, Command, SIZE>;

/// Consumer side owned by the loop.
pub type CommandReceiver<'a, const SIZE: usize> = Receiver<'a, Command, SIZE>;

/// Queue for outbound reports.
pub type ReportChannel<const SIZE: usize> = Channel<Report, SIZE>;

/// Producer side owned by the loop.
pub type ReportSender<'a, const SIZE: usize> = Sender<'a, Report, SIZE>;

/// Consumer side handed to the network publisher.
pub type ReportReceiver<'a, const SIZE: usize> = Receiver<'a, Report, SIZE>;

/// Phases of one controller tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Reading,
    Applying,
    Publishing,
}

/// Timing result of one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// Deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait before the next tick; zero when behind schedule.
    pub sleep_duration: Duration,
}

/// The control core, generic over the injected hardware capabilities.
///
/// `IA`/`IB` are the intensity encoder phases, `TA`/`TB` the temperature
/// encoder phases, `W`/`C` the warm and cold PWM channels and `S` the
/// non-volatile storage backing the persistence layer.
pub struct Controller<'a, IA, IB, TA, TB, W, C, S, const CMD: usize, const REP: usize> {
    config: ControlConfig,
    intensity_encoder: EncoderPair<IA, IB>,
    temperature_encoder: EncoderPair<TA, TB>,
    store: ValueStore,
    output: OutputStage<W, C>,
    persistence: PersistenceService<S>,
    commands: CommandReceiver<'a, CMD>,
    reports: ReportSender<'a, REP>,
    phase: Phase,
    last_published: Option<StateReport>,
    next_tick: Instant,
}

impl<'a, IA, IB, TA, TB, W, C, S, const CMD: usize, const REP: usize>
    Controller<'a, IA, IB, TA, TB, W, C, S, CMD, REP>
where
    IA: InputPin,
    IB: InputPin,
    TA: InputPin,
    TB: InputPin,
    W: SetDutyCycle,
    C: SetDutyCycle,
    S: Storage,
{
    /// Assemble the loop and restore the persisted values.
    ///
    /// Both channels are loaded from storage; an unreadable or out-of-range
    /// record falls back to its configured default. The first tick applies
    /// the restored state to the outputs. The persistence quiet period is
    /// taken from `config.commit_quiet`.
    pub fn new(
        config: ControlConfig,
        intensity_encoder: EncoderPair<IA, IB>,
        temperature_encoder: EncoderPair<TA, TB>,
        output: OutputStage<W, C>,
        mut persistence: PersistenceService<S>,
        commands: CommandReceiver<'a, CMD>,
        reports: ReportSender<'a, REP>,
    ) -> Self {
        persistence.set_quiet(config.commit_quiet);
        let intensity = persistence.load(
            ControlId::Intensity,
            config.intensity_max,
            config.intensity_default,
        );
        let temperature = persistence.load(
            ControlId::Temperature,
            config.temperature_max,
            config.temperature_default,
        );
        log::debug!("restored intensity={intensity} temperature={temperature}");

        Self {
            store: ValueStore::new(&config, intensity, temperature),
            config,
            intensity_encoder,
            temperature_encoder,
            output,
            persistence,
            commands,
            reports,
            phase: Phase::Idle,
            last_published: None,
            next_tick: Instant::from_millis(0),
        }
    }

    /// Run one tick and return the deadline for the next.
    pub fn tick(&mut self, now: Instant) -> TickResult {
        // Skip the backlog instead of catching up after a long stall
        let max_drift = Duration::from_millis(self.config.tick.as_millis() * 2);
        if now.as_millis() > self.next_tick.as_millis() + max_drift.as_millis() {
            self.next_tick = now;
        }

        self.phase = Phase::Reading;
        let intensity_step = i16::from(self.intensity_encoder.poll());
        let temperature_step = i16::from(self.temperature_encoder.poll());
        let mut pending: Vec<Command, CMD> = Vec::new();
        self.commands.drain(|command| {
            // Queue and Vec share the capacity, so this cannot overflow
            let _ = pending.push(command);
        });

        self.phase = Phase::Applying;
        if intensity_step != 0 {
            self.store.apply_delta(ControlId::Intensity, intensity_step);
        }
        if temperature_step != 0 {
            self.store
                .apply_delta(ControlId::Temperature, temperature_step);
        }
        for command in pending {
            self.apply_command(command);
        }

        for channel in ControlId::ALL {
            if self.store.take_persist_dirty(channel) {
                self.persistence
                    .note_change(channel, self.store.read(channel), now);
            }
        }

        if self.store.output_dirty() {
            self.output.apply(self.mix_input());
            self.store.clear_output_dirty();
        }
        self.persistence.service(now);

        self.phase = Phase::Publishing;
        let snapshot = self.state();
        if self.last_published != Some(snapshot) {
            if self.reports.try_send(Report::State(snapshot)).is_err() {
                log::warn!("report queue full, state notification dropped");
            }
            self.last_published = Some(snapshot);
        }
        self.phase = Phase::Idle;

        self.next_tick += self.config.tick;
        let sleep_duration = if self.next_tick.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_tick.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };
        TickResult {
            next_deadline: self.next_tick,
            sleep_duration,
        }
    }

    /// Snapshot of the current values.
    pub fn state(&self) -> StateReport {
        StateReport {
            intensity: self.store.read(ControlId::Intensity),
            temperature: self.store.read(ControlId::Temperature),
        }
    }

    /// The phase the loop is currently in.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a debounced commit is still outstanding.
    pub fn persistence_pending(&self) -> bool {
        self.persistence.has_pending()
    }

    fn apply_command(&mut self, command: Command) {
        match command {
            Command::Set { channel, value } => {
                if let Err(rejected) = self.store.set_absolute(channel, value) {
                    log::warn!(
                        "{}: rejected value {} (max {})",
                        channel.as_str(),
                        rejected.value,
                        rejected.max
                    );
                    let _ = self.reports.try_send(Report::Rejected(rejected));
                }
            }
            Command::Step { channel, delta } => {
                self.store.apply_delta(channel, delta);
            }
            Command::Get => {
                let _ = self.reports.try_send(Report::State(self.state()));
            }
        }
    }

    fn mix_input(&self) -> MixInput {
        MixInput {
            intensity: self.store.read(ControlId::Intensity),
            intensity_max: self.store.max(ControlId::Intensity),
            temperature: self.store.read(ControlId::Temperature),
            temperature_max: self.store.max(ControlId::Temperature),
        }
    }
}
