use std::io;

use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::display::DisplaySink;
use crate::display::RenderMode;
use crate::events::InputEvent;
use crate::menu::SelectionMenu;
use crate::simulation::Simulation;
use crate::simulation::SimulationError;
use crate::simulation::Stats;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Display error: {0}")]
    Display(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Picking a pattern
    Menu,

    /// A pattern is running
    Running,
}

/// Ties the pattern menu to the simulation.
///
/// In [`Mode::Menu`], `Next` moves the cursor and `Confirm` starts the selected pattern. Once
/// running, `Next` moves on to the following pattern and restarts with it, while `Confirm`
/// restarts the current one.
pub struct App {
    menu: SelectionMenu,
    sim: Simulation,
    mode: Mode,
    render_mode: RenderMode,
}

impl App {
    pub fn new(menu: SelectionMenu, sim: Simulation) -> Self {
        Self {
            menu,
            sim,
            mode: Mode::Menu,
            render_mode: RenderMode::default(),
        }
    }

    pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn menu(&self) -> &SelectionMenu {
        &self.menu
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn stats(&self) -> Stats {
        self.sim.stats()
    }

    /// Skip the menu and start `pattern` right away. The menu cursor is moved onto `pattern` if it
    /// is listed, so that `Next` carries on from there.
    pub fn launch<R>(&mut self, pattern: &str, rng: &mut R) -> Result<(), AppError>
    where
        R: Rng + ?Sized,
    {
        for _ in 0..self.menu.len() {
            if self.menu.confirm() == pattern {
                break;
            }

            self.menu.advance();
        }

        self.sim.start(pattern, rng)?;
        self.mode = Mode::Running;

        info!(pattern, "launched");

        Ok(())
    }

    /// React to one input event. Only ever changes the grid at a generation boundary.
    ///
    /// On error the menu, the mode and the running pattern are all left as they were.
    pub fn handle<R>(&mut self, event: InputEvent, rng: &mut R) -> Result<(), AppError>
    where
        R: Rng + ?Sized,
    {
        match (self.mode, event) {
            (_, InputEvent::None) => {}

            (Mode::Menu, InputEvent::Next) => self.menu.advance(),
            (Mode::Menu, InputEvent::Confirm) => {
                let pattern = self.menu.confirm();
                self.sim.start(pattern, rng)?;
                self.mode = Mode::Running;

                info!(pattern, "started");
            }

            // The cursor only moves once the new pattern is running
            (Mode::Running, InputEvent::Next) => {
                let mut menu = self.menu.clone();
                menu.advance();

                self.sim.reseed(menu.confirm(), rng)?;
                self.menu = menu;
            }
            (Mode::Running, InputEvent::Confirm) => {
                self.sim.reseed(self.menu.confirm(), rng)?;
            }
        }

        Ok(())
    }

    /// Draw the current generation, then compute the next one. Does nothing in [`Mode::Menu`].
    pub fn frame<S>(&mut self, sink: &mut S) -> Result<(), AppError>
    where
        S: DisplaySink + ?Sized,
    {
        if self.mode != Mode::Running {
            return Ok(());
        }

        self.sim.render(sink, self.render_mode)?;
        self.sim.step()?;

        Ok(())
    }
}
