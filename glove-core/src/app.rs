//! GloveApp: owns every piece of glove state and runs one loop step at a time.

use crate::assembler::{assemble, FrameError};
use crate::button::Debouncer;
use crate::config::{ConfigError, GloveConfig, FLEX_COUNT};
use crate::display::{self, Color, Display, FaultScreen, Spinner};
use crate::flex::FlexSensor;
use crate::input::{AnalogSource, ImuSource, InputError};
use crate::link::{ConnectionMachine, ConnectionState, Effect, LinkEvent, Step, TransitionError};
use crate::output::{OutputError, TelemetryLink};
use crate::scheduler::TransmitScheduler;
use crate::text::DisplayMessage;
use glove_proto::TelemetryFrame;

/// What the screen is doing, independent of the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// [`GloveApp::boot`] has not run yet.
    PowerOn,
    /// Splash image is up until `until_ms`.
    Splash { until_ms: u64, imu_ok: bool },
    /// Waiting caption with the loading spinner; `frame` is drawn at `next_ms`.
    Spinner {
        spinner: Spinner,
        frame: u8,
        next_ms: u64,
    },
    /// Boot animation finished or cut short by a connection.
    Running,
    /// IMU wiring hint is up until `until_ms`, then the flex pin list.
    WiringHint { until_ms: u64 },
    /// A fault screen is up; nothing else runs.
    Halted,
}

/// The glove application.
///
/// Link callbacks arrive as [`LinkEvent`] values through
/// [`handle_event`](Self::handle_event); everything else happens in
/// [`poll`](Self::poll), called once per loop iteration with the current
/// monotonic time. No method blocks or sleeps.
///
/// # Error Handling
///
/// Errors are returned so the caller can log them. None of them stop the
/// loop: a failed sensor read or notify skips that frame and is retried on
/// the next poll. Configuration and missing-IMU faults put the app into
/// [`Phase::Halted`] after showing a diagnostic screen.
pub struct GloveApp<A, I, D, L> {
    config: GloveConfig,
    sensors: [FlexSensor; FLEX_COUNT],
    analog: A,
    imu: I,
    display: D,
    link: L,
    machine: ConnectionMachine,
    scheduler: TransmitScheduler,
    debouncer: Debouncer,
    message: DisplayMessage,
    phase: Phase,
}

impl<A, I, D, L> GloveApp<A, I, D, L>
where
    A: AnalogSource,
    I: ImuSource,
    D: Display,
    L: TelemetryLink,
{
    /// Create the app from a configuration and its collaborators.
    pub fn new(config: GloveConfig, analog: A, imu: I, display: D, link: L) -> Self {
        Self {
            sensors: FlexSensor::from_config(&config),
            scheduler: TransmitScheduler::new(config.timing.transmit_interval_ms),
            debouncer: Debouncer::new(config.timing.debounce_ms),
            config,
            analog,
            imu,
            display,
            link,
            machine: ConnectionMachine::new(),
            message: DisplayMessage::new(),
            phase: Phase::PowerOn,
        }
    }

    /// Validate the configuration, bring up the IMU, show the splash, and
    /// start advertising.
    ///
    /// A configuration error halts immediately with a diagnostic screen. A
    /// missing IMU lets the splash run its course and then shows the wiring
    /// screens from [`poll`](Self::poll); the link is never started.
    pub async fn boot(&mut self, now_ms: u64) -> Result<(), AppError> {
        if self.phase != Phase::PowerOn {
            return Err(AppError::Transition(TransitionError::AlreadyStarted));
        }
        if let Err(e) = self.config.validate() {
            #[cfg(feature = "defmt")]
            defmt::error!("configuration rejected: {}", e);
            display::draw_fault(&mut self.display, FaultScreen::Config(e), &self.config);
            self.display.flush();
            self.phase = Phase::Halted;
            return Err(e.into());
        }

        self.display.show_splash();
        self.display.flush();
        let until_ms = now_ms.saturating_add(self.config.timing.splash_ms);

        if let Err(e) = self.imu.init().await {
            #[cfg(feature = "defmt")]
            defmt::error!("IMU init failed: {}", e);
            self.phase = Phase::Splash {
                until_ms,
                imu_ok: false,
            };
            return Err(e.into());
        }

        self.phase = Phase::Splash {
            until_ms,
            imu_ok: true,
        };
        let steps = self.machine.start()?;
        self.apply(&steps).await
    }

    /// Apply one event from the radio task.
    pub async fn handle_event(&mut self, event: LinkEvent) -> Result<(), AppError> {
        match event {
            LinkEvent::Connected => {
                let steps = self.machine.on_connect()?;
                if !steps.is_empty()
                    && matches!(self.phase, Phase::Splash { .. } | Phase::Spinner { .. })
                {
                    self.phase = Phase::Running;
                }
                self.apply(&steps).await
            }
            LinkEvent::Disconnected => {
                let steps = self.machine.on_disconnect()?;
                self.apply(&steps).await
            }
            LinkEvent::Written(bytes) => self.on_write(&bytes).await,
        }
    }

    /// Run one loop step at `now_ms` with the button level sampled by the caller.
    ///
    /// Returns the frame sent to the central, if one was due.
    pub async fn poll(
        &mut self,
        now_ms: u64,
        button_low: bool,
    ) -> Result<Option<TelemetryFrame>, AppError> {
        self.advance_screens(now_ms);

        if !self.machine.is_connected() {
            return Ok(None);
        }

        if self.debouncer.on_edge(button_low, now_ms).is_some() {
            self.toggle_scale();
        }

        if !self.scheduler.due(now_ms, self.machine.state()) {
            return Ok(None);
        }
        let frame = self.acquire().await?;
        self.link.notify(&frame).await?;
        self.scheduler.mark_sent(now_ms);

        #[cfg(feature = "defmt")]
        defmt::trace!("sent {}", frame);
        Ok(Some(frame))
    }

    /// Current link state.
    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.machine.state()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.phase == Phase::Halted
    }

    #[inline]
    pub fn config(&self) -> &GloveConfig {
        &self.config
    }

    /// Last message received and its font scale.
    #[inline]
    pub fn message(&self) -> &DisplayMessage {
        &self.message
    }

    /// Flex sensors with their latest samples.
    #[inline]
    pub fn sensors(&self) -> &[FlexSensor; FLEX_COUNT] {
        &self.sensors
    }

    #[inline]
    pub fn display(&self) -> &D {
        &self.display
    }

    #[inline]
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    #[inline]
    pub fn link(&self) -> &L {
        &self.link
    }

    #[inline]
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Decompose the app into its collaborators.
    pub fn into_parts(self) -> (A, I, D, L) {
        (self.analog, self.imu, self.display, self.link)
    }

    async fn apply(&mut self, steps: &[Step]) -> Result<(), AppError> {
        let mut result = Ok(());
        for step in steps {
            #[cfg(feature = "defmt")]
            defmt::info!("link {} -> {}", step.from, step.to);
            for effect in step.effects {
                match *effect {
                    Effect::ClearScreen => self.display.fill_screen(Color::Black),
                    Effect::ShowStatus(status) => {
                        display::draw_status_banner(&mut self.display, status);
                    }
                    Effect::StartAdvertising => {
                        if let Err(e) = self.link.start_advertising().await {
                            result = Err(e.into());
                        }
                    }
                }
            }
        }
        if !steps.is_empty() {
            self.display.flush();
        }
        result
    }

    async fn on_write(&mut self, bytes: &[u8]) -> Result<(), AppError> {
        if bytes.is_empty() {
            #[cfg(feature = "defmt")]
            defmt::debug!("ignoring empty write");
            return Ok(());
        }
        display::clear_main_area(&mut self.display);
        self.message.replace(bytes);
        display::draw_message(&mut self.display, &self.message);
        self.display.flush();
        self.link.echo(bytes).await?;
        Ok(())
    }

    fn toggle_scale(&mut self) {
        let _scale = self.message.toggle_scale();
        #[cfg(feature = "defmt")]
        defmt::info!("button: font scale {}", _scale);
        display::clear_main_area(&mut self.display);
        display::draw_message(&mut self.display, &self.message);
        self.display.flush();
    }

    fn advance_screens(&mut self, now_ms: u64) {
        let timing = self.config.timing;

        if let Phase::Splash { until_ms, imu_ok } = self.phase {
            if now_ms < until_ms {
                return;
            }
            if imu_ok {
                let spinner = display::draw_waiting_screen(&mut self.display);
                self.phase = Phase::Spinner {
                    spinner,
                    frame: 0,
                    next_ms: now_ms,
                };
            } else {
                display::draw_fault(&mut self.display, FaultScreen::ImuWiring, &self.config);
                self.display.flush();
                self.phase = Phase::WiringHint {
                    until_ms: now_ms.saturating_add(timing.fault_hold_ms),
                };
                return;
            }
        }

        match self.phase {
            Phase::Spinner {
                spinner,
                frame,
                next_ms,
            } if now_ms >= next_ms => {
                if frame < timing.spinner_frames {
                    spinner.draw(&mut self.display, frame);
                    self.display.flush();
                    self.phase = Phase::Spinner {
                        spinner,
                        frame: frame + 1,
                        next_ms: now_ms.saturating_add(timing.spinner_frame_ms),
                    };
                } else {
                    self.phase = Phase::Running;
                }
            }
            Phase::WiringHint { until_ms } if now_ms >= until_ms => {
                display::draw_fault(&mut self.display, FaultScreen::FlexPins, &self.config);
                self.display.flush();
                self.phase = Phase::Halted;
            }
            _ => {}
        }
    }

    async fn acquire(&mut self) -> Result<TelemetryFrame, AppError> {
        let sample = self.imu.read().await?;
        let angles = if self.config.flex_present {
            self.sample_flex()?
        } else {
            [0; FLEX_COUNT]
        };
        Ok(assemble(angles, sample.gyro, sample.accel)?)
    }

    fn sample_flex(&mut self) -> Result<[i16; FLEX_COUNT], InputError> {
        let mut angles = [0; FLEX_COUNT];
        for (sensor, angle) in self.sensors.iter_mut().zip(angles.iter_mut()) {
            for _ in 0..self.config.warmup_passes {
                sensor.calibrate(self.analog.read_raw(sensor.pin())?);
            }
            sensor.update(self.analog.read_raw(sensor.pin())?);
            *angle = sensor.angle_slot();
        }
        Ok(angles)
    }
}

/// Error type for application operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppError {
    Config(ConfigError),
    Input(InputError),
    Output(OutputError),
    Frame(FrameError),
    Transition(TransitionError),
}

impl core::fmt::Display for AppError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {}", e),
            Self::Input(e) => write!(f, "input: {}", e),
            Self::Output(e) => write!(f, "output: {}", e),
            Self::Frame(e) => write!(f, "frame: {}", e),
            Self::Transition(e) => write!(f, "link: {}", e),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<InputError> for AppError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<OutputError> for AppError {
    fn from(e: OutputError) -> Self {
        Self::Output(e)
    }
}

impl From<FrameError> for AppError {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        Self::Transition(e)
    }
}
