#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerClass {
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLASSES: [PlayerClass; 4] = [
    PlayerClass {
        name: "Wanderer",
        description: "Balanced stats, good at exploring.",
    },
    PlayerClass {
        name: "Mystic",
        description: "High magic, low strength.",
    },
    PlayerClass {
        name: "Warrior",
        description: "High strength, low magic.",
    },
    PlayerClass {
        name: "Rogue",
        description: "Stealthy and quick.",
    },
];

const WORLD_PROGRESS_STEP: u8 = 10;
const WORLD_PROGRESS_CEILING: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialStep {
    Clearing,
    Name,
    Class,
    HowToPlay,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialInput {
    Char(char),
    Backspace,
    Up,
    Down,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub name: String,
    pub class_name: String,
}

/// Onboarding wizard shown while the backend generates the world.
#[derive(Debug, Clone)]
pub struct Tutorial {
    step: TutorialStep,
    name: String,
    class_index: usize,
    class_description_visible: bool,
    world_progress: u8,
    world_ready: bool,
}

impl Default for Tutorial {
    fn default() -> Self {
        Self {
            step: TutorialStep::Clearing,
            name: String::new(),
            class_index: 0,
            class_description_visible: false,
            world_progress: 0,
            world_ready: false,
        }
    }
}

impl Tutorial {
    pub fn step(&self) -> TutorialStep {
        self.step
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selected_class(&self) -> PlayerClass {
        CLASSES[self.class_index]
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn is_class_description_visible(&self) -> bool {
        self.class_description_visible
    }

    pub fn world_progress(&self) -> u8 {
        self.world_progress
    }

    pub fn is_world_ready(&self) -> bool {
        self.world_ready
    }

    /// Simulated progress while the backend has not reported an active run.
    pub fn bump_world_progress(&mut self) {
        if self.world_progress < WORLD_PROGRESS_CEILING {
            self.world_progress = (self.world_progress + WORLD_PROGRESS_STEP).min(WORLD_PROGRESS_CEILING);
        }
    }

    pub fn mark_world_ready(&mut self) {
        self.world_progress = 100;
        self.world_ready = true;
    }

    /// Returns the finished player details once the last step is confirmed.
    pub fn handle(&mut self, input: TutorialInput) -> Option<PlayerInfo> {
        match (self.step, input) {
            (TutorialStep::Clearing, TutorialInput::Confirm) => {
                self.step = TutorialStep::Name;
            }
            (TutorialStep::Name, TutorialInput::Char(c)) if !c.is_control() => {
                self.name.push(c);
            }
            (TutorialStep::Name, TutorialInput::Backspace) => {
                self.name.pop();
            }
            (TutorialStep::Name, TutorialInput::Confirm) => {
                let trimmed = self.name.trim();
                if !trimmed.is_empty() {
                    self.name = trimmed.to_string();
                    self.step = TutorialStep::Class;
                }
            }
            (TutorialStep::Class, TutorialInput::Up) => {
                self.class_index = (self.class_index + CLASSES.len() - 1) % CLASSES.len();
                self.class_description_visible = true;
            }
            (TutorialStep::Class, TutorialInput::Down) => {
                self.class_index = (self.class_index + 1) % CLASSES.len();
                self.class_description_visible = true;
            }
            (TutorialStep::Class, TutorialInput::Confirm) => {
                self.step = TutorialStep::HowToPlay;
            }
            (TutorialStep::HowToPlay, TutorialInput::Confirm) => {
                self.step = TutorialStep::Ready;
            }
            (TutorialStep::Ready, TutorialInput::Confirm) if self.world_ready => {
                return Some(PlayerInfo {
                    name: self.name.clone(),
                    class_name: self.selected_class().name.to_string(),
                });
            }
            _ => {}
        }
        None
    }

    pub fn ready_label(&self) -> String {
        if self.world_ready {
            "Enter the World".to_string()
        } else {
            format!("Preparing the world... ({}%)", self.world_progress)
        }
    }
}
