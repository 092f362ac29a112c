use ratatui::prelude::*;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Clear, Padding, Paragraph, Wrap};

use crate::app::{App, ClickTarget, Modal, Screen};
use crate::backend::Scene;
use crate::text_layout::wrap_lines;
use crate::theme::Theme;
use crate::tutorial::{CLASSES, TutorialStep};

pub const PROMPT: &str = "adventure@terminal:~$ ";

const TEXT_PADDING: u16 = 1;
const STATUS_HEIGHT: u16 = 3;
const TITLE_BAR_HEIGHT: u16 = 3;
const INPUT_HEIGHT: u16 = 3;
const RESULT_HEIGHT: u16 = 6;
const SIDEBAR_PERCENT: u16 = 35;
const MAX_SUGGESTIONS: usize = 6;
const MODAL_WIDTH: u16 = 60;
const STATUS_HELP_TEXT: &str =
    "F1 help | Ctrl+S save | Ctrl+O load | Ctrl+R reset | PgUp/PgDn scroll | Ctrl+C quit";

const HELP_LINES: [&str; 10] = [
    "Type a command and press Enter to act.",
    "Start typing to see matching actions; Up/Down pick one, Tab completes it.",
    "Up/Down with no matches walks through earlier commands.",
    "Click an action, item, or character to use it directly.",
    "Esc reveals the scene description at once.",
    "PgUp/PgDn or the mouse wheel scroll the scene.",
    "Ctrl+S saves, Ctrl+O loads, Ctrl+R reloads the scene.",
    "While talking to someone, Enter sends your reply.",
    "Ctrl+C quits.",
    "Esc or F1 closes this window.",
];

const HOW_TO_PLAY_LINES: [&str; 5] = [
    "Each scene describes where you are and what you can do.",
    "Type actions like 'go north', 'take torch', or 'talk to hermit'.",
    "Matching actions appear as you type; Tab completes the highlighted one.",
    "Up/Down recall commands you already used.",
    "Press F1 at any time for help.",
];

#[derive(Debug, Clone, Copy)]
struct PlayingAreas {
    scene_title: Rect,
    description: Rect,
    result: Rect,
    sidebar: Rect,
    input: Rect,
    status: Rect,
}

fn playing_areas(screen: Rect) -> PlayingAreas {
    let [body, input, status] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(screen);
    let [scene, sidebar] = Layout::horizontal([
        Constraint::Percentage(100 - SIDEBAR_PERCENT),
        Constraint::Percentage(SIDEBAR_PERCENT),
    ])
    .areas(body);
    let [scene_title, description, result] = Layout::vertical([
        Constraint::Length(TITLE_BAR_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(RESULT_HEIGHT),
    ])
    .areas(scene);
    PlayingAreas {
        scene_title,
        description,
        result,
        sidebar,
        input,
        status,
    }
}

fn padded(area: Rect) -> Rect {
    Block::default()
        .padding(Padding::uniform(TEXT_PADDING))
        .inner(area)
}

/// One row of the sidebar. Rendering and hit testing both walk this list so
/// a clicked row always maps to the entry drawn there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SidebarEntry {
    Heading(&'static str),
    Npc(usize),
    Item(usize),
    Inventory(usize),
    Choice(usize),
    Nothing,
    Blank,
}

impl SidebarEntry {
    fn target(self) -> Option<ClickTarget> {
        match self {
            Self::Npc(idx) => Some(ClickTarget::Npc(idx)),
            Self::Item(idx) => Some(ClickTarget::Item(idx)),
            Self::Choice(idx) => Some(ClickTarget::Choice(idx)),
            Self::Heading(_) | Self::Inventory(_) | Self::Nothing | Self::Blank => None,
        }
    }
}

fn sidebar_entries(scene: &Scene) -> Vec<SidebarEntry> {
    let sections: [(&'static str, usize, fn(usize) -> SidebarEntry); 4] = [
        ("Characters", scene.npcs.len(), SidebarEntry::Npc),
        ("Items", scene.items.len(), SidebarEntry::Item),
        ("Inventory", scene.inventory.len(), SidebarEntry::Inventory),
        ("Actions", scene.choices.len(), SidebarEntry::Choice),
    ];
    let mut entries = Vec::new();
    for (idx, (heading, count, entry)) in sections.into_iter().enumerate() {
        if idx > 0 {
            entries.push(SidebarEntry::Blank);
        }
        entries.push(SidebarEntry::Heading(heading));
        if count == 0 {
            entries.push(SidebarEntry::Nothing);
        }
        entries.extend((0..count).map(entry));
    }
    entries
}

fn suggestion_overlay(input: Rect, count: usize) -> Option<Rect> {
    if count == 0 || input.width == 0 {
        return None;
    }
    let shown = count.min(MAX_SUGGESTIONS) as u16;
    let height = shown.saturating_add(TEXT_PADDING * 2);
    let y = input.y.saturating_sub(height);
    Some(Rect::new(input.x, y, input.width, height.min(input.y)))
}

fn centered_rect(screen: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(screen.width);
    let height = height.min(screen.height);
    let x = screen.x + screen.width.saturating_sub(width) / 2;
    let y = screen.y + screen.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn load_modal_rows(screen: Rect, save_count: usize) -> u16 {
    let max_rows = screen.height.saturating_sub(8).max(1);
    (save_count.max(1) as u16).min(max_rows)
}

fn modal_rect(screen: Rect, modal: &Modal) -> Rect {
    let height = match modal {
        Modal::Help => HELP_LINES.len() as u16 + 4,
        Modal::Save { .. } => 7,
        Modal::Load { saves, .. } => load_modal_rows(screen, saves.len()) + 4,
    };
    centered_rect(screen, MODAL_WIDTH, height)
}

/// First row of a scrolling list so the selected entry stays visible.
fn window_start(selected: usize, shown: usize) -> usize {
    selected.saturating_sub(shown.saturating_sub(1))
}

/// First suggestion shown in the dropdown, scrolled so the cursor stays visible.
fn suggestion_window_start(selected: Option<usize>) -> usize {
    selected.map_or(0, |selected| window_start(selected, MAX_SUGGESTIONS))
}

/// Maps a left click at `(x, y)` to whatever is drawn there on the playing
/// screen.
pub fn hit_test(screen: Rect, app: &App, x: u16, y: u16) -> Option<ClickTarget> {
    if app.screen() != Screen::Playing {
        return None;
    }
    if let Some(modal) = app.modal() {
        let Modal::Load { saves, selected } = modal else {
            return None;
        };
        let inner = padded(modal_rect(screen, modal));
        let list = Rect::new(
            inner.x,
            inner.y.saturating_add(1),
            inner.width,
            inner.height.saturating_sub(1),
        );
        if !point_in_rect(list, x, y) {
            return None;
        }
        let shown = load_modal_rows(screen, saves.len()) as usize;
        let idx = window_start(*selected, shown) + (y - list.y) as usize;
        return (idx < saves.len()).then_some(ClickTarget::SaveEntry(idx));
    }

    let areas = playing_areas(screen);
    let command_line = app.command_line();
    if !command_line.is_conversation_mode()
        && let Some(overlay) = suggestion_overlay(areas.input, command_line.suggestions().len())
    {
        let inner = padded(overlay);
        if point_in_rect(inner, x, y) {
            let start = suggestion_window_start(command_line.suggestion_cursor().index());
            let idx = start + (y - inner.y) as usize;
            return (idx < command_line.suggestions().len()).then_some(ClickTarget::Suggestion(idx));
        }
        if point_in_rect(overlay, x, y) {
            return None;
        }
    }

    let scene = app.scene()?;
    let inner = padded(areas.sidebar);
    if !point_in_rect(inner, x, y) {
        return None;
    }
    sidebar_entries(scene)
        .get((y - inner.y) as usize)
        .and_then(|entry| entry.target())
}

/// Largest useful scroll offset for the scene description.
pub fn description_max_scroll(screen: Rect, app: &App) -> u16 {
    let inner = padded(playing_areas(screen).description);
    if inner.width == 0 {
        return 0;
    }
    let total = wrap_lines(app.visible_description(), inner.width).len() as u16;
    total.saturating_sub(inner.height)
}

pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.scene_bg)),
        frame.area(),
    );
    match app.screen() {
        Screen::Boot => render_boot(frame, app, theme),
        Screen::Tutorial => render_tutorial(frame, app, theme),
        Screen::Loading => render_loading(frame, app, theme),
        Screen::Playing => render_playing(frame, app, theme),
        Screen::Error => render_error(frame, app, theme),
    }
}

fn render_boot(frame: &mut Frame, app: &App, theme: &Theme) {
    let [body, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)])
            .areas(frame.area());
    let mut lines: Vec<Line> = app
        .boot_lines()
        .iter()
        .map(|message| {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(theme.prompt_fg)),
                Span::styled(*message, Style::default().fg(theme.text_fg)),
            ])
        })
        .collect();
    lines.push(Line::from(Span::styled(
        blink_cursor(app.ticks),
        Style::default().fg(theme.prompt_fg),
    )));
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(theme.scene_bg))
            .block(Block::default().padding(Padding::uniform(TEXT_PADDING))),
        body,
    );
    render_status_text(frame, status, "Press any key to skip", theme);
}

fn blink_cursor(ticks: u64) -> &'static str {
    if (ticks / 30) % 2 == 0 { "_" } else { " " }
}

fn render_tutorial(frame: &mut Frame, app: &App, theme: &Theme) {
    let [body, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)])
            .areas(frame.area());
    let tutorial = app.tutorial();
    let text_style = Style::default().fg(theme.text_fg);
    let muted = Style::default().fg(theme.muted_fg);
    let title_style = Style::default()
        .fg(theme.prompt_fg)
        .add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    let mut cursor = None;
    match tutorial.step() {
        TutorialStep::Clearing => {
            lines.push(Line::styled("A Forest Clearing", title_style));
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                "You wake on cold moss. Mist drifts between the trees and somewhere a stream is running.",
                text_style,
            ));
            lines.push(Line::raw(""));
            lines.push(Line::styled("Press Enter to continue", muted));
        }
        TutorialStep::Name => {
            lines.push(Line::styled("What is your name, traveler?", title_style));
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::styled("> ", Style::default().fg(theme.prompt_fg)),
                Span::styled(tutorial.name().to_string(), text_style),
            ]));
            lines.push(Line::raw(""));
            lines.push(Line::styled("Type a name and press Enter", muted));
            cursor = Some((2 + tutorial.name().chars().count() as u16, 2u16));
        }
        TutorialStep::Class => {
            lines.push(Line::styled("Choose your path", title_style));
            lines.push(Line::raw(""));
            for (idx, class) in CLASSES.iter().enumerate() {
                let selected = idx == tutorial.class_index();
                let style = if selected {
                    Style::default()
                        .fg(theme.choice_fg)
                        .bg(theme.highlight_bg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    text_style
                };
                lines.push(Line::from(vec![
                    Span::styled(if selected { "> " } else { "  " }, muted),
                    Span::styled(class.name, style),
                ]));
            }
            lines.push(Line::raw(""));
            if tutorial.is_class_description_visible() {
                lines.push(Line::styled(tutorial.selected_class().description, text_style));
            }
            lines.push(Line::styled("Up/Down to choose, Enter to confirm", muted));
        }
        TutorialStep::HowToPlay => {
            lines.push(Line::styled("How to play", title_style));
            lines.push(Line::raw(""));
            lines.extend(
                HOW_TO_PLAY_LINES
                    .iter()
                    .map(|line| Line::styled(*line, text_style)),
            );
            lines.push(Line::raw(""));
            lines.push(Line::styled("Press Enter to continue", muted));
        }
        TutorialStep::Ready => {
            lines.push(Line::styled(
                format!("Welcome, {} the {}.", tutorial.name(), tutorial.selected_class().name),
                title_style,
            ));
            lines.push(Line::raw(""));
            let label_style = if tutorial.is_world_ready() {
                Style::default()
                    .fg(theme.choice_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                muted
            };
            lines.push(Line::styled(format!("[ {} ]", tutorial.ready_label()), label_style));
        }
    }

    let panel = centered_rect(body, 80, lines.len() as u16 + 4);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(theme.modal_bg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.modal_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        panel,
    );
    if let Some((col, row)) = cursor {
        let inner = padded(panel);
        frame.set_cursor_position((
            inner.x.saturating_add(col.min(inner.width.saturating_sub(1))),
            inner.y.saturating_add(row),
        ));
    }

    let status_text = format!("World generation: {}%", tutorial.world_progress());
    render_status_text(frame, status, &status_text, theme);
}

fn render_loading(frame: &mut Frame, app: &App, theme: &Theme) {
    let (headline, hint) = if app.is_scene_loading() {
        ("Entering the world...", "Please wait")
    } else if app.error().is_some() {
        ("The world did not answer.", "Press Enter to continue")
    } else {
        ("The world is ready.", "Press Enter to begin")
    };
    let lines = vec![
        Line::styled(
            headline,
            Style::default()
                .fg(theme.prompt_fg)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled(
            progress_bar(app.loading_progress(), 30),
            Style::default().fg(theme.text_fg),
        ),
        Line::raw(""),
        Line::styled(hint, Style::default().fg(theme.muted_fg)),
    ];
    let panel = centered_rect(frame.area(), 50, lines.len() as u16 + 2);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(theme.modal_bg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.modal_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        panel,
    );
}

fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width) / 100;
    format!(
        "[{}{}] {percent}%",
        "#".repeat(filled),
        ".".repeat(width - filled)
    )
}

fn render_error(frame: &mut Frame, app: &App, theme: &Theme) {
    let detail = app.error().unwrap_or("Unknown error");
    let mut lines = vec![
        Line::styled(
            "Something went wrong",
            Style::default()
                .fg(theme.error_fg)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
    ];
    lines.extend(
        wrap_lines(detail, MODAL_WIDTH.saturating_sub(TEXT_PADDING * 2))
            .into_iter()
            .map(|line| Line::styled(line, Style::default().fg(theme.text_fg))),
    );
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Press Enter to retry, Ctrl+C to quit",
        Style::default().fg(theme.muted_fg),
    ));
    let panel = centered_rect(frame.area(), MODAL_WIDTH, lines.len() as u16 + 2);
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(theme.modal_bg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.modal_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        panel,
    );
}

fn render_playing(frame: &mut Frame, app: &App, theme: &Theme) {
    let areas = playing_areas(frame.area());
    render_scene_title(frame, areas.scene_title, app, theme);
    render_description(frame, areas.description, app, theme);
    render_result(frame, areas.result, app, theme);
    render_sidebar(frame, areas.sidebar, app, theme);
    render_input(frame, areas.input, app, theme);

    let status_text = match app.notice() {
        Some(notice) => format!("{notice} | {STATUS_HELP_TEXT}"),
        None => STATUS_HELP_TEXT.to_string(),
    };
    render_status_text(frame, areas.status, &status_text, theme);

    let command_line = app.command_line();
    if app.modal().is_none() && !command_line.is_conversation_mode() {
        render_suggestions(frame, areas.input, app, theme);
    }
    if let Some(modal) = app.modal() {
        render_modal(frame, modal, theme);
    }
}

fn render_scene_title(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let title_bg = theme.status_bg;
    let mut spans = Vec::new();
    if let Some(scene) = app.scene() {
        spans.push(Span::styled(
            scene_display_name(&scene.scene_id),
            Style::default()
                .fg(theme.prompt_fg)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" | scenes visited: {}", scene.visited_scenes),
            Style::default().fg(theme.muted_fg),
        ));
        if !scene.seed.is_empty() {
            spans.push(Span::styled(
                format!(" | seed: {}", scene.seed),
                Style::default().fg(theme.muted_fg),
            ));
        }
    }
    if let Some(partner) = app.conversation_partner() {
        spans.push(Span::styled(
            format!(" | talking to {partner}"),
            Style::default().fg(theme.npc_fg),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .style(Style::default().bg(title_bg))
                .padding(Padding::uniform(TEXT_PADDING)),
        ),
        area,
    );
}

/// `forest_clearing` -> `Forest Clearing`.
fn scene_display_name(scene_id: &str) -> String {
    scene_id
        .split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_description(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let inner = padded(area);
    let lines = wrap_lines(app.visible_description(), inner.width.max(1));
    let mut text = Text::from(
        lines
            .into_iter()
            .map(|line| Line::styled(line, Style::default().fg(theme.text_fg)))
            .collect::<Vec<_>>(),
    );
    if !app.is_description_revealed() {
        text.push_line(Line::styled(
            "(Esc to reveal)",
            Style::default().fg(theme.muted_fg),
        ));
    }
    let max_scroll = description_max_scroll(frame.area(), app);
    frame.render_widget(
        Paragraph::new(text)
            .scroll((app.scene_scroll().min(max_scroll), 0))
            .style(Style::default().bg(theme.scene_bg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.scene_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        area,
    );
}

fn render_result(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let inner = padded(area);
    let lines: Vec<Line> = wrap_lines(app.result(), inner.width.max(1))
        .into_iter()
        .map(|line| Line::styled(line, Style::default().fg(theme.choice_fg)))
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .style(Style::default().bg(theme.input_bg))
                .padding(Padding::uniform(TEXT_PADDING)),
        ),
        area,
    );
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let block = Block::default()
        .style(Style::default().bg(theme.status_bg))
        .padding(Padding::uniform(TEXT_PADDING));
    let Some(scene) = app.scene() else {
        frame.render_widget(block, area);
        return;
    };
    let lines: Vec<Line> = sidebar_entries(scene)
        .into_iter()
        .map(|entry| sidebar_line(entry, scene, app, theme))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn sidebar_line(entry: SidebarEntry, scene: &Scene, app: &App, theme: &Theme) -> Line<'static> {
    let bullet = |text: &str, style: Style| {
        Line::from(vec![
            Span::styled("  - ", Style::default().fg(theme.muted_fg)),
            Span::styled(text.to_string(), style),
        ])
    };
    match entry {
        SidebarEntry::Heading(heading) => Line::styled(
            heading,
            Style::default()
                .fg(theme.text_fg)
                .add_modifier(Modifier::BOLD),
        ),
        SidebarEntry::Npc(idx) => bullet(&scene.npcs[idx], Style::default().fg(theme.npc_fg)),
        SidebarEntry::Item(idx) => bullet(&scene.items[idx], Style::default().fg(theme.item_fg)),
        SidebarEntry::Inventory(idx) => {
            let item = &scene.inventory[idx];
            let mut style = Style::default().fg(theme.item_fg);
            if app.is_newly_added(item) {
                style = style.bg(theme.highlight_bg).add_modifier(Modifier::BOLD);
            }
            bullet(item, style)
        }
        SidebarEntry::Choice(idx) => {
            bullet(&scene.choices[idx], Style::default().fg(theme.choice_fg))
        }
        SidebarEntry::Nothing => Line::styled("  (none)", Style::default().fg(theme.muted_fg)),
        SidebarEntry::Blank => Line::raw(""),
    }
}

fn render_input(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let command_line = app.command_line();
    let (prompt, buffer) = match app.conversation_partner() {
        Some(partner) if command_line.is_conversation_mode() => (
            format!("say to {partner}> "),
            command_line.conversation_buffer(),
        ),
        _ => (PROMPT.to_string(), command_line.buffer()),
    };
    let inner = padded(area);
    let caret_col = (prompt.chars().count() + buffer.caret()) as u16;
    let h_scroll = caret_col.saturating_sub(inner.width.saturating_sub(1));

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(prompt, Style::default().fg(theme.prompt_fg)),
            Span::styled(buffer.text().to_string(), Style::default().fg(theme.text_fg)),
        ]))
        .scroll((0, h_scroll))
        .block(
            Block::default()
                .style(Style::default().bg(theme.input_bg))
                .padding(Padding::uniform(TEXT_PADDING)),
        ),
        area,
    );

    if app.modal().is_none() && inner.width > 0 && inner.height > 0 {
        frame.set_cursor_position((inner.x.saturating_add(caret_col - h_scroll), inner.y));
    }
}

fn render_suggestions(frame: &mut Frame, input: Rect, app: &App, theme: &Theme) {
    let command_line = app.command_line();
    let suggestions = command_line.suggestions();
    let Some(overlay) = suggestion_overlay(input, suggestions.len()) else {
        return;
    };
    let selected = command_line.suggestion_cursor().index();
    let start = suggestion_window_start(selected);
    let lines: Vec<Line> = suggestions
        .iter()
        .enumerate()
        .skip(start)
        .take(MAX_SUGGESTIONS)
        .map(|(idx, suggestion)| {
            let style = if selected == Some(idx) {
                Style::default()
                    .fg(theme.choice_fg)
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_fg)
            };
            Line::styled(suggestion.clone(), style)
        })
        .collect();

    frame.render_widget(Clear, overlay);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .style(Style::default().bg(theme.modal_bg))
                .padding(Padding::uniform(TEXT_PADDING)),
        ),
        overlay,
    );
}

fn render_modal(frame: &mut Frame, modal: &Modal, theme: &Theme) {
    let overlay = modal_rect(frame.area(), modal);
    let title_style = Style::default()
        .fg(theme.prompt_fg)
        .add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(theme.muted_fg);
    let text_style = Style::default().fg(theme.text_fg);

    let mut cursor = None;
    let lines: Vec<Line> = match modal {
        Modal::Help => {
            let mut lines = vec![Line::styled("Help", title_style), Line::raw("")];
            lines.extend(HELP_LINES.iter().map(|line| Line::styled(*line, text_style)));
            lines
        }
        Modal::Save { name } => {
            let label = "Name: ";
            cursor = Some(((label.chars().count() + name.chars().count()) as u16, 2u16));
            vec![
                Line::styled("Save Game", title_style),
                Line::raw(""),
                Line::from(vec![
                    Span::styled(label, muted),
                    Span::styled(name.clone(), text_style),
                ]),
                Line::raw(""),
                Line::styled("Enter to save, Esc to cancel", muted),
            ]
        }
        Modal::Load { saves, selected } => {
            let mut lines = vec![Line::from(vec![
                Span::styled("Load Game", title_style),
                Span::raw(" "),
                Span::styled("(Up/Down select, Enter load, Esc cancel)", muted),
            ])];
            if saves.is_empty() {
                lines.push(Line::styled("No saved games yet.", muted));
            }
            let shown = load_modal_rows(frame.area(), saves.len()) as usize;
            let start = window_start(*selected, shown);
            for (idx, save) in saves.iter().enumerate().skip(start).take(shown) {
                let is_selected = idx == *selected;
                let style = if is_selected {
                    Style::default()
                        .fg(theme.choice_fg)
                        .bg(theme.highlight_bg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    text_style
                };
                lines.push(Line::from(vec![
                    Span::styled(if is_selected { "> " } else { "  " }, muted),
                    Span::styled(save.clone(), style),
                ]));
            }
            lines
        }
    };

    frame.render_widget(Clear, overlay);
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(theme.modal_bg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.modal_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        overlay,
    );
    if let Some((col, row)) = cursor {
        let inner = padded(overlay);
        frame.set_cursor_position((
            inner.x.saturating_add(col.min(inner.width.saturating_sub(1))),
            inner.y.saturating_add(row),
        ));
    }
}

fn render_status_text(frame: &mut Frame, area: Rect, text: &str, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(text.to_string())
            .style(Style::default().bg(theme.status_bg).fg(theme.muted_fg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.status_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        area,
    );
}

fn point_in_rect(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
#[path = "../tests/unit/ui_tests.rs"]
mod tests;
