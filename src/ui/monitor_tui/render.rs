use chrono::Local;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use super::app::MonitorApp;
use super::widgets::{event_style, format_bytes, format_frequency, format_rate, usage_bar};
use crate::core::system_monitor::SystemSource;

const APP_TITLE: &str = "Vajra v1.0";
const OVERVIEW_HEIGHT: u16 = 12;
const BAR_WIDTH: usize = 20;
const CORE_BAR_WIDTH: usize = 10;

/// Main render function
pub fn render_ui<S: SystemSource>(frame: &mut Frame, app: &MonitorApp<S>) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(OVERVIEW_HEIGHT), Constraint::Min(0)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(columns[1]);

    render_header(frame, rows[0], app);
    render_overview(frame, left[0], app);
    render_cores(frame, left[1], app);
    render_processes(frame, right[0], app);
    render_event_log(frame, right[1], app);
}

fn render_header<S: SystemSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::White).bg(Color::Blue));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(inner);

    let title = Paragraph::new(Span::styled(
        APP_TITLE,
        Style::default().add_modifier(Modifier::BOLD),
    ));
    let details = Paragraph::new(format!(
        "{} • {} Cores • {}",
        app.host_name,
        app.logical_cores(),
        Local::now().format("%H:%M:%S")
    ))
    .alignment(Alignment::Right)
    .style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(title, halves[0]);
    frame.render_widget(details, halves[1]);
}

fn render_overview<S: SystemSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let snapshot = &app.snapshot;
    let memory = &snapshot.memory;
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut rows = vec![
        Row::new(vec![
            Cell::from("CPU"),
            Cell::from(usage_bar(snapshot.cpu_total_percent, BAR_WIDTH)),
            Cell::from(format_frequency(snapshot.cpu_frequency_mhz)).style(dim),
        ]),
        Row::new(vec![
            Cell::from("RAM"),
            Cell::from(usage_bar(memory.percent, BAR_WIDTH)),
            Cell::from(format!(
                "{}/{} ({} Free)",
                format_bytes(memory.used_bytes),
                format_bytes(memory.total_bytes),
                format_bytes(memory.available_bytes)
            ))
            .style(dim),
        ]),
    ];

    for (device, disk) in &snapshot.disks {
        rows.push(Row::new(vec![
            Cell::from(format!("Disk {}", device)),
            Cell::from(usage_bar(disk.percent, BAR_WIDTH)),
            Cell::from(format!("{} Free", format_bytes(disk.free_bytes))).style(dim),
        ]));
    }

    rows.push(Row::new(vec![
        Cell::from("Network"),
        Cell::from(""),
        Cell::from(format!(
            "↑ {}  ↓ {}",
            format_rate(snapshot.network_sent_bytes_per_sec),
            format_rate(snapshot.network_recv_bytes_per_sec)
        ))
        .style(dim),
    ]));

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(BAR_WIDTH as u16 + 5),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["Resource", "Usage", "Details"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Overview ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(table, area);
}

fn render_cores<S: SystemSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let cores = &app.snapshot.cpu_per_core;

    let rows: Vec<Row> = cores
        .chunks(2)
        .enumerate()
        .map(|(pair, chunk)| {
            let cells: Vec<Cell> = chunk
                .iter()
                .enumerate()
                .map(|(offset, &usage)| {
                    let index = pair * 2 + offset + 1;
                    let mut line = usage_bar(usage, CORE_BAR_WIDTH);
                    line.spans.insert(0, Span::raw(format!("C{:02}: ", index)));
                    Cell::from(line)
                })
                .collect();
            Row::new(cells)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Core Usage ")
            .border_style(Style::default().fg(Color::Magenta)),
    );

    frame.render_widget(table, area);
}

fn render_processes<S: SystemSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let rows: Vec<Row> = app
        .snapshot
        .top_processes
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.pid.to_string()),
                Cell::from(p.name.clone()),
                Cell::from(format!("{:.1}", p.cpu_percent)),
                Cell::from(format!("{:.1}", p.memory_percent)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(10),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(
        Row::new(vec!["PID", "Name", "CPU%", "Mem%"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Top Processes ")
            .border_style(Style::default().fg(Color::Green)),
    );

    frame.render_widget(table, area);
}

fn render_event_log<S: SystemSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Event Log ")
        .border_style(Style::default().fg(Color::Blue));

    if app.events.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No active events...",
            Style::default()
                .add_modifier(Modifier::DIM)
                .add_modifier(Modifier::ITALIC),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app
        .events
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(entry.clock()).style(Style::default().add_modifier(Modifier::DIM)),
                Cell::from(entry.message.clone()).style(event_style(&entry.message)),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(8), Constraint::Min(10)]).block(block);
    frame.render_widget(table, area);
}
