use std::time::Duration;

use chrono::NaiveDateTime;

use crate::backend::{LoadedGame, RunState, RunStatus, Scene, StartRunRequest};
use crate::command_line::{CommandLine, LineKey};
use crate::events::AppEvent;
use crate::tutorial::{Tutorial, TutorialInput};
use crate::typewriter::Typewriter;
use crate::worker::{BackendEvent, BackendRequest, RunPurpose};

pub const BOOT_MESSAGES: [&str; 8] = [
    "Booting up Dark Forest Adventure OS v0.1.2...",
    "Initializing memory banks...",
    "Loading procedural templates...",
    "Establishing connection to story engine...",
    "Generating world seed...",
    "Loading locations, items, and NPCs...",
    "Applying CRT filters...",
    "Starting World Generation.",
];

const BOOT_STEP_INTERVAL: Duration = Duration::from_millis(700);
const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(500);
const STATUS_RETRY_INTERVAL: Duration = Duration::from_millis(700);
const SCENE_REFRESH_DELAY: Duration = Duration::from_millis(500);
const NEW_ITEM_HIGHLIGHT: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Boot,
    Tutorial,
    Loading,
    Playing,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Help,
    Save { name: String },
    Load { saves: Vec<String>, selected: usize },
}

/// Something clickable on screen, resolved by the renderer's hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Choice(usize),
    Item(usize),
    Npc(usize),
    Suggestion(usize),
    SaveEntry(usize),
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub skip_boot: bool,
    pub typewriter_per_char: Duration,
    pub history_limit: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            skip_boot: false,
            typewriter_per_char: Duration::from_millis(18),
            history_limit: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct ScheduledRequest {
    due: Duration,
    request: BackendRequest,
}

#[derive(Debug, Clone)]
struct ItemHighlight {
    item: String,
    until: Duration,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub ticks: u64,
    clock: Duration,
    screen: Screen,
    boot_step: usize,
    boot_elapsed: Duration,
    tutorial: Tutorial,
    world_generation_active: bool,
    scene: Option<Scene>,
    scene_loading: bool,
    loading_progress: u8,
    result: String,
    error: Option<String>,
    notice: Option<String>,
    command_line: CommandLine,
    typewriter: Typewriter,
    highlight: Option<ItemHighlight>,
    modal: Option<Modal>,
    scene_scroll: u16,
    scheduled: Vec<ScheduledRequest>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppSettings::default())
    }
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            running: true,
            ticks: 0,
            clock: Duration::ZERO,
            screen: if settings.skip_boot {
                Screen::Tutorial
            } else {
                Screen::Boot
            },
            boot_step: 0,
            boot_elapsed: Duration::ZERO,
            tutorial: Tutorial::default(),
            world_generation_active: false,
            scene: None,
            scene_loading: false,
            loading_progress: 0,
            result: String::new(),
            error: None,
            notice: None,
            command_line: CommandLine::with_history_limit(settings.history_limit),
            typewriter: Typewriter::new(settings.typewriter_per_char),
            highlight: None,
            modal: None,
            scene_scroll: 0,
            scheduled: Vec::new(),
        }
    }

    /// Requests to issue before the first frame.
    pub fn start(&mut self) -> Vec<BackendRequest> {
        if self.screen == Screen::Tutorial && !self.world_generation_active {
            return self.begin_world_generation();
        }
        Vec::new()
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn boot_lines(&self) -> &[&'static str] {
        &BOOT_MESSAGES[..self.boot_step.min(BOOT_MESSAGES.len())]
    }

    pub fn tutorial(&self) -> &Tutorial {
        &self.tutorial
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn visible_description(&self) -> &str {
        self.typewriter.visible()
    }

    pub fn is_description_revealed(&self) -> bool {
        self.typewriter.is_done()
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn command_line(&self) -> &CommandLine {
        &self.command_line
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn loading_progress(&self) -> u8 {
        self.loading_progress
    }

    pub fn is_scene_loading(&self) -> bool {
        self.scene_loading
    }

    pub fn scene_scroll(&self) -> u16 {
        self.scene_scroll
    }

    pub fn clamp_scene_scroll(&mut self, max_scroll: u16) {
        self.scene_scroll = self.scene_scroll.min(max_scroll);
    }

    pub fn conversation_partner(&self) -> Option<&str> {
        self.scene
            .as_ref()
            .and_then(|scene| scene.current_conversation.as_deref())
    }

    pub fn is_newly_added(&self, item: &str) -> bool {
        self.highlight
            .as_ref()
            .is_some_and(|highlight| highlight.item == item)
    }

    /// Advances timers by `elapsed` and returns any requests that fell due.
    pub fn on_tick(&mut self, elapsed: Duration) -> Vec<BackendRequest> {
        self.ticks = self.ticks.saturating_add(1);
        self.clock += elapsed;
        let mut requests = Vec::new();

        if self.screen == Screen::Boot {
            self.boot_elapsed += elapsed;
            while self.screen == Screen::Boot && self.boot_elapsed >= BOOT_STEP_INTERVAL {
                self.boot_elapsed -= BOOT_STEP_INTERVAL;
                if self.boot_step < BOOT_MESSAGES.len() {
                    self.boot_step += 1;
                } else {
                    requests.extend(self.finish_boot());
                }
            }
        }

        self.typewriter.advance(elapsed);
        if self
            .highlight
            .as_ref()
            .is_some_and(|highlight| highlight.until <= self.clock)
        {
            self.highlight = None;
        }

        let clock = self.clock;
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|scheduled| scheduled.due <= clock);
        self.scheduled = pending;
        requests.extend(due.into_iter().map(|scheduled| scheduled.request));
        requests
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<BackendRequest> {
        if event == AppEvent::Quit {
            self.quit();
            return Vec::new();
        }
        if event == AppEvent::Tick {
            return Vec::new();
        }
        match self.screen {
            Screen::Boot => self.finish_boot(),
            Screen::Tutorial => self.handle_tutorial_event(event),
            Screen::Loading => {
                if event == AppEvent::Submit && !self.scene_loading {
                    self.screen = if self.error.is_some() {
                        Screen::Error
                    } else {
                        Screen::Playing
                    };
                    self.loading_progress = 0;
                }
                Vec::new()
            }
            Screen::Error => {
                if event == AppEvent::Submit {
                    return self.fetch_scene();
                }
                Vec::new()
            }
            Screen::Playing => {
                if self.modal.is_some() {
                    return self.handle_modal_event(event);
                }
                self.handle_playing_event(event)
            }
        }
    }

    pub fn handle_click(&mut self, target: ClickTarget) -> Vec<BackendRequest> {
        if self.screen != Screen::Playing {
            return Vec::new();
        }
        if let Some(Modal::Load { saves, .. }) = &self.modal {
            if let ClickTarget::SaveEntry(idx) = target
                && let Some(name) = saves.get(idx).cloned()
            {
                self.modal = None;
                return vec![BackendRequest::Load(name)];
            }
            return Vec::new();
        }
        if self.modal.is_some() {
            return Vec::new();
        }
        let Some(scene) = self.scene.as_ref() else {
            return Vec::new();
        };
        let command = match target {
            ClickTarget::Choice(idx) => scene.choices.get(idx).cloned(),
            ClickTarget::Item(idx) => scene.items.get(idx).map(|item| format!("take {item}")),
            ClickTarget::Npc(idx) => scene
                .npcs
                .get(idx)
                .map(|npc| format!("talk to {}", npc.to_lowercase())),
            ClickTarget::Suggestion(idx) => {
                self.command_line.pick_suggestion(idx);
                None
            }
            ClickTarget::SaveEntry(_) => None,
        };
        let Some(command) = command else {
            return Vec::new();
        };
        match self.command_line.submit_direct(&command) {
            Some(text) => {
                self.notice = None;
                vec![BackendRequest::Command {
                    text,
                    conversation: false,
                }]
            }
            None => Vec::new(),
        }
    }

    pub fn on_backend_event(&mut self, event: BackendEvent) -> Vec<BackendRequest> {
        match event {
            BackendEvent::RunStarted {
                purpose: RunPurpose::WorldGeneration,
                result,
            } => match result {
                Ok(message) => {
                    log::info!("world generation started: {message}");
                    vec![BackendRequest::PollStatus]
                }
                Err(_) => {
                    self.world_generation_active = false;
                    self.tutorial.mark_world_ready();
                    Vec::new()
                }
            },
            BackendEvent::RunStarted {
                purpose: RunPurpose::Player,
                result,
            } => match result {
                Ok(message) => {
                    log::info!("player run started: {message}");
                    self.fetch_scene()
                }
                Err(detail) => {
                    self.scene_loading = false;
                    self.error = Some(detail);
                    Vec::new()
                }
            },
            BackendEvent::StatusPolled(result) => {
                self.on_status_polled(result);
                Vec::new()
            }
            BackendEvent::SceneFetched(Ok(scene)) => {
                self.apply_scene(scene);
                Vec::new()
            }
            BackendEvent::SceneFetched(Err(detail)) => {
                self.scene_loading = false;
                self.loading_progress = 0;
                self.scene = None;
                self.error = Some(detail);
                if self.screen == Screen::Playing {
                    self.screen = Screen::Error;
                    self.modal = None;
                }
                Vec::new()
            }
            BackendEvent::CommandFinished {
                conversation,
                result,
            } => match result {
                Ok(text) => {
                    self.result = if !text.is_empty() {
                        text
                    } else if conversation {
                        "Response processed".to_string()
                    } else {
                        "Command processed".to_string()
                    };
                    self.error = None;
                    self.schedule(SCENE_REFRESH_DELAY, BackendRequest::FetchScene);
                    Vec::new()
                }
                Err(detail) => {
                    self.result.clear();
                    self.error = Some(detail);
                    if self.screen == Screen::Playing {
                        self.screen = Screen::Error;
                        self.modal = None;
                    }
                    Vec::new()
                }
            },
            BackendEvent::Saved(result) => {
                self.notice = Some(match result {
                    Ok(message) => message,
                    Err(detail) => format!("Save failed: {detail}"),
                });
                Vec::new()
            }
            BackendEvent::SavesListed(result) => {
                match result {
                    Ok(saves) if self.screen == Screen::Playing => {
                        self.modal = Some(Modal::Load { saves, selected: 0 });
                    }
                    Ok(_) => {}
                    Err(detail) => {
                        self.notice = Some(format!("Failed to fetch saves: {detail}"));
                    }
                }
                Vec::new()
            }
            BackendEvent::Loaded(result) => {
                match result {
                    Ok(LoadedGame { scene, message }) => {
                        self.apply_scene(scene);
                        self.result = message;
                    }
                    Err(detail) => {
                        self.notice = Some(format!("Load failed: {detail}"));
                    }
                }
                Vec::new()
            }
        }
    }

    fn begin_world_generation(&mut self) -> Vec<BackendRequest> {
        self.world_generation_active = true;
        vec![BackendRequest::StartRun {
            purpose: RunPurpose::WorldGeneration,
            request: StartRunRequest {
                seed: None,
                name: Some(String::new()),
                chosen_class: Some(String::new()),
            },
        }]
    }

    fn finish_boot(&mut self) -> Vec<BackendRequest> {
        if self.screen != Screen::Boot {
            return Vec::new();
        }
        self.boot_step = BOOT_MESSAGES.len();
        self.screen = Screen::Tutorial;
        self.begin_world_generation()
    }

    fn on_status_polled(&mut self, result: Result<RunStatus, String>) {
        if !self.world_generation_active || self.screen != Screen::Tutorial {
            return;
        }
        match result {
            Ok(status) if status.state() == RunState::Active => {
                self.world_generation_active = false;
                self.tutorial.mark_world_ready();
            }
            Ok(_) => {
                self.tutorial.bump_world_progress();
                self.schedule(STATUS_POLL_INTERVAL, BackendRequest::PollStatus);
            }
            Err(_) => {
                self.schedule(STATUS_RETRY_INTERVAL, BackendRequest::PollStatus);
            }
        }
    }

    fn handle_tutorial_event(&mut self, event: AppEvent) -> Vec<BackendRequest> {
        let input = match event {
            AppEvent::InputChar(c) => TutorialInput::Char(c),
            AppEvent::Backspace => TutorialInput::Backspace,
            AppEvent::Up => TutorialInput::Up,
            AppEvent::Down => TutorialInput::Down,
            AppEvent::Submit => TutorialInput::Confirm,
            _ => return Vec::new(),
        };
        let Some(info) = self.tutorial.handle(input) else {
            return Vec::new();
        };
        log::info!("player '{}' chose {}", info.name, info.class_name);
        let request = StartRunRequest {
            seed: None,
            name: Some(info.name),
            chosen_class: Some(info.class_name),
        };
        self.world_generation_active = false;
        self.scheduled.clear();
        self.screen = Screen::Loading;
        self.scene_loading = true;
        self.loading_progress = 0;
        vec![BackendRequest::StartRun {
            purpose: RunPurpose::Player,
            request,
        }]
    }

    fn handle_playing_event(&mut self, event: AppEvent) -> Vec<BackendRequest> {
        match event {
            AppEvent::Up => {
                self.command_line.on_key(LineKey::Up);
            }
            AppEvent::Down => {
                self.command_line.on_key(LineKey::Down);
            }
            AppEvent::Tab => {
                self.command_line.on_key(LineKey::Tab);
            }
            AppEvent::InputChar(c) => self.command_line.insert_char(c),
            AppEvent::Backspace => self.command_line.backspace(),
            AppEvent::Delete => self.command_line.delete(),
            AppEvent::Left => self.command_line.move_caret_left(),
            AppEvent::Right => self.command_line.move_caret_right(),
            AppEvent::Home => self.command_line.move_caret_home(),
            AppEvent::End => self.command_line.move_caret_end(),
            AppEvent::Escape => self.typewriter.finish(),
            AppEvent::ScrollUp => self.scene_scroll = self.scene_scroll.saturating_sub(1),
            AppEvent::ScrollDown => self.scene_scroll = self.scene_scroll.saturating_add(1),
            AppEvent::ToggleHelp => self.modal = Some(Modal::Help),
            AppEvent::OpenSave => {
                self.modal = Some(Modal::Save {
                    name: default_save_name(chrono::Local::now().naive_local()),
                });
            }
            AppEvent::OpenLoad => return vec![BackendRequest::ListSaves],
            AppEvent::Reset => {
                self.screen = Screen::Loading;
                return self.fetch_scene();
            }
            AppEvent::Submit => return self.submit_command(),
            AppEvent::Tick | AppEvent::Quit | AppEvent::MouseLeftClick(..) => {}
        }
        Vec::new()
    }

    fn handle_modal_event(&mut self, event: AppEvent) -> Vec<BackendRequest> {
        let Some(modal) = self.modal.as_mut() else {
            return Vec::new();
        };
        if event == AppEvent::Escape {
            self.modal = None;
            return Vec::new();
        }
        match modal {
            Modal::Help => {
                if matches!(event, AppEvent::ToggleHelp | AppEvent::Submit) {
                    self.modal = None;
                }
                Vec::new()
            }
            Modal::Save { name } => match event {
                AppEvent::InputChar(c) if !c.is_control() => {
                    name.push(c);
                    Vec::new()
                }
                AppEvent::Backspace => {
                    name.pop();
                    Vec::new()
                }
                AppEvent::Submit => {
                    let filename = name.trim().to_string();
                    self.modal = None;
                    vec![BackendRequest::Save(
                        (!filename.is_empty()).then_some(filename),
                    )]
                }
                _ => Vec::new(),
            },
            Modal::Load { saves, selected } => match event {
                AppEvent::Up => {
                    *selected = selected.saturating_sub(1);
                    Vec::new()
                }
                AppEvent::Down => {
                    if *selected + 1 < saves.len() {
                        *selected += 1;
                    }
                    Vec::new()
                }
                AppEvent::Submit => {
                    let chosen = saves.get(*selected).cloned();
                    self.modal = None;
                    chosen.map(BackendRequest::Load).into_iter().collect()
                }
                _ => Vec::new(),
            },
        }
    }

    fn submit_command(&mut self) -> Vec<BackendRequest> {
        let conversation = self.command_line.is_conversation_mode();
        let Some(text) = self.command_line.submit() else {
            return Vec::new();
        };
        self.notice = None;
        vec![BackendRequest::Command { text, conversation }]
    }

    fn fetch_scene(&mut self) -> Vec<BackendRequest> {
        self.scene_loading = true;
        vec![BackendRequest::FetchScene]
    }

    fn apply_scene(&mut self, scene: Scene) {
        if let Some(previous) = self.scene.as_ref() {
            let added = scene
                .inventory
                .iter()
                .find(|item| !previous.inventory.contains(*item));
            self.highlight = added.map(|item| ItemHighlight {
                item: item.clone(),
                until: self.clock + NEW_ITEM_HIGHLIGHT,
            });
            if previous.scene_id != scene.scene_id {
                self.scene_scroll = 0;
            }
        }
        self.typewriter.set_text(&scene.description);
        self.command_line.set_choices(scene.choices.clone());
        self.command_line
            .set_conversation_mode(scene.current_conversation.is_some());
        self.scene = Some(scene);
        self.error = None;
        self.scene_loading = false;
        self.loading_progress = 100;
        if self.screen == Screen::Error {
            self.screen = Screen::Playing;
        }
    }

    fn schedule(&mut self, delay: Duration, request: BackendRequest) {
        self.scheduled.push(ScheduledRequest {
            due: self.clock + delay,
            request,
        });
    }
}

/// Local timestamp with every separator turned into `-`, e.g.
/// `10-16-2026--14-03-05`.
pub fn default_save_name(now: NaiveDateTime) -> String {
    now.format("%m-%d-%Y--%H-%M-%S").to_string()
}

#[cfg(test)]
#[path = "../tests/unit/app_tests.rs"]
mod tests;
