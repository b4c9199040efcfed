//! Terminal chart window.
//!
//! Two stacked panels on a shared horizontal axis:
//! - Price: candlesticks, close line, MA5 and MA25, legend
//! - Volume: one bar per trading day
//!
//! Position `i` of the series lands in the same terminal column in
//! both panels and in the date axis beneath them.

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use stockviz_report::ChartViews;

/// Columns reserved for y-axis labels inside each panel.
const LABEL_WIDTH: u16 = 9;

/// Chart palette.
#[derive(Debug, Clone, Copy)]
pub struct ChartColors {
    pub up: Color,
    pub down: Color,
    pub close: Color,
    pub ma5: Color,
    pub ma25: Color,
    pub volume: Color,
    pub muted: Color,
}

impl Default for ChartColors {
    fn default() -> Self {
        Self {
            up: Color::Red,
            down: Color::Blue,
            close: Color::Gray,
            ma5: Color::Rgb(255, 165, 0),
            ma25: Color::Green,
            volume: Color::Magenta,
            muted: Color::DarkGray,
        }
    }
}

/// Maps series positions to terminal columns.
#[derive(Debug, Clone, Copy)]
struct XScale {
    left: u16,
    width: u16,
    len: usize,
}

impl XScale {
    /// Scale for a bordered panel (or the axis row beneath one) spanning `area`.
    fn for_area(area: Rect, len: usize) -> Self {
        Self {
            left: area.x + 1 + LABEL_WIDTH,
            width: area.width.saturating_sub(2 + LABEL_WIDTH),
            len,
        }
    }

    /// Center column of slot `index`.
    fn column(&self, index: usize) -> u16 {
        if self.len == 0 || self.width == 0 {
            return self.left;
        }
        let slot = (2 * index + 1) * self.width as usize / (2 * self.len);
        self.left + slot.min(self.width as usize - 1) as u16
    }
}

/// Map a value to a row offset in a plot of `height` rows (0 = top).
fn value_to_y(value: f64, lower: f64, upper: f64, height: u16) -> u16 {
    if (upper - lower).abs() < 1e-9 || height == 0 {
        return 0;
    }
    let frac = (value - lower) / (upper - lower);
    let y = height.saturating_sub(1) as f64 * (1.0 - frac);
    y.round().max(0.0).min(height.saturating_sub(1) as f64) as u16
}

fn compact_volume(volume: u64) -> String {
    let v = volume as f64;
    if v >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if v >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if v >= 1e3 {
        format!("{:.1}K", v / 1e3)
    } else {
        volume.to_string()
    }
}

fn no_data_block(title: &str, colors: &ChartColors) -> Block<'static> {
    Block::default()
        .title(format!(" {} [No Data] ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.muted))
}

/// Upper panel: candlesticks with close and moving average lines.
pub struct PricePanel<'a> {
    views: &'a ChartViews,
    colors: ChartColors,
}

impl<'a> PricePanel<'a> {
    pub fn new(views: &'a ChartViews, colors: ChartColors) -> Self {
        Self { views, colors }
    }

    fn draw_line(
        buf: &mut Buffer,
        points: &[(f64, f64)],
        scale: XScale,
        bounds: (f64, f64, u16, u16),
        style: Style,
    ) {
        let (lower, upper, top, height) = bounds;
        let at = |p: &(f64, f64)| {
            (
                scale.column(p.0 as usize),
                top + value_to_y(p.1, lower, upper, height),
            )
        };

        for (i, p) in points.iter().enumerate() {
            let (x0, y0) = at(p);
            buf.set_string(x0, y0, "•", style);

            // Connect to the next point only across adjacent positions
            let Some(next) = points.get(i + 1) else { continue };
            if next.0 - p.0 > 1.0 {
                continue;
            }
            let (x1, y1) = at(next);
            let span = x1.saturating_sub(x0);
            for step in 1..span {
                let t = step as f64 / span as f64;
                let y = y0 as f64 + (y1 as f64 - y0 as f64) * t;
                buf.set_string(x0 + step, y.round() as u16, "·", style);
            }
        }
    }
}

impl Widget for PricePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let views = self.views;
        let colors = self.colors;

        let Some((min, max)) = views.price_bounds() else {
            no_data_block(&views.title, &colors).render(area, buf);
            return;
        };

        let block = Block::default()
            .title(format!(" {} | {} ", views.title, views.price_label))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        // Top row holds the legend
        if inner.height < 2 || inner.width <= LABEL_WIDTH {
            return;
        }
        let plot_top = inner.y + 1;
        let plot_height = inner.height - 1;

        let range = max - min;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        let (lower, upper) = (min - pad, max + pad);

        // Y-axis labels
        let labels = [upper, (upper + lower) / 2.0, lower];
        let rows = [0, plot_height / 2, plot_height - 1];
        for (value, row) in labels.iter().zip(rows) {
            buf.set_string(
                inner.x,
                plot_top + row,
                format!("{:>8.1}", value),
                Style::default().fg(colors.muted),
            );
        }

        let scale = XScale::for_area(area, views.len);

        for candle in &views.candles {
            let x = scale.column(candle.index);
            let style = Style::default().fg(if candle.is_up() { colors.up } else { colors.down });

            let high_y = value_to_y(candle.high, lower, upper, plot_height);
            let low_y = value_to_y(candle.low, lower, upper, plot_height);
            let body_top = value_to_y(candle.open.max(candle.close), lower, upper, plot_height);
            let body_bottom = value_to_y(candle.open.min(candle.close), lower, upper, plot_height);

            for y in high_y..body_top {
                buf.set_string(x, plot_top + y, "│", style);
            }
            for y in body_top..=body_bottom {
                buf.set_string(x, plot_top + y, "█", style);
            }
            for y in (body_bottom + 1)..=low_y {
                buf.set_string(x, plot_top + y, "│", style);
            }
        }

        let bounds = (lower, upper, plot_top, plot_height);
        let lines = [
            (&views.close, colors.close),
            (&views.ma5, colors.ma5),
            (&views.ma25, colors.ma25),
        ];
        for (points, color) in lines {
            Self::draw_line(buf, points, scale, bounds, Style::default().fg(color));
        }

        // Legend, right-aligned on the top row
        let legend = Line::from(vec![
            Span::styled("━ Close ", Style::default().fg(colors.close)),
            Span::styled("━ MA5 ", Style::default().fg(colors.ma5)),
            Span::styled("━ MA25", Style::default().fg(colors.ma25)),
        ]);
        let width = legend.width() as u16;
        let x = inner.right().saturating_sub(width).max(inner.x);
        buf.set_line(x, inner.y, &legend, inner.right() - x);
    }
}

/// Lower panel: volume bars.
pub struct VolumePanel<'a> {
    views: &'a ChartViews,
    colors: ChartColors,
}

impl<'a> VolumePanel<'a> {
    pub fn new(views: &'a ChartViews, colors: ChartColors) -> Self {
        Self { views, colors }
    }
}

impl Widget for VolumePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let max = self.views.max_volume();
        if max == 0 {
            no_data_block("Volume", &self.colors).render(area, buf);
            return;
        }

        let block = Block::default()
            .title(" Volume ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width <= LABEL_WIDTH {
            return;
        }

        buf.set_string(
            inner.x,
            inner.y,
            format!("{:>8}", compact_volume(max)),
            Style::default().fg(self.colors.muted),
        );

        let scale = XScale::for_area(area, self.views.len);
        let style = Style::default().fg(self.colors.volume);
        let bottom = inner.bottom() - 1;

        for bar in &self.views.volume {
            if bar.volume == 0 {
                continue;
            }
            let frac = bar.volume as f64 / max as f64;
            let height = ((frac * inner.height as f64).round() as u16).clamp(1, inner.height);
            let x = scale.column(bar.index);
            for dy in 0..height {
                buf.set_string(x, bottom - dy, "█", style);
            }
        }
    }
}

/// Date labels under the panels, one character per row.
pub struct DateAxis<'a> {
    views: &'a ChartViews,
    colors: ChartColors,
}

impl<'a> DateAxis<'a> {
    pub fn new(views: &'a ChartViews, colors: ChartColors) -> Self {
        Self { views, colors }
    }

    /// Rows needed for the longest label.
    pub fn height(views: &ChartViews) -> u16 {
        views
            .ticks
            .iter()
            .map(|(_, label)| label.chars().count())
            .max()
            .unwrap_or(0) as u16
    }
}

impl Widget for DateAxis<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let scale = XScale::for_area(area, self.views.len);
        let style = Style::default().fg(self.colors.muted);
        let mut last_column = None;

        for (index, label) in &self.views.ticks {
            let x = scale.column(*index);
            // Skip ticks that would overwrite their neighbour on narrow terminals
            if last_column == Some(x) || x >= area.right() {
                continue;
            }
            last_column = Some(x);

            for (row, ch) in label.chars().take(area.height as usize).enumerate() {
                buf.set_string(x, area.y + row as u16, ch.to_string(), style);
            }
        }
    }
}

/// Full-screen chart shown until `q` or `Esc` is pressed.
pub struct ChartWindow {
    colors: ChartColors,
    poll_ms: u64,
}

impl Default for ChartWindow {
    fn default() -> Self {
        Self::new(ChartColors::default())
    }
}

impl ChartWindow {
    /// Create a chart window.
    pub fn new(colors: ChartColors) -> Self {
        Self {
            colors,
            poll_ms: 250,
        }
    }

    /// Show the chart and block until the user closes it.
    pub fn show(&self, views: &ChartViews) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal, views);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    fn run_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        views: &ChartViews,
    ) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.ui(f, views))?;

            if event::poll(Duration::from_millis(self.poll_ms))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press
                        && (key.code == KeyCode::Char('q') || key.code == KeyCode::Esc)
                    {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn ui(&self, frame: &mut Frame, views: &ChartViews) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),                          // Panels
                Constraint::Length(DateAxis::height(views)), // Date axis
                Constraint::Length(1),                       // Help
            ])
            .split(frame.area());

        let panels = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(3, 4), Constraint::Ratio(1, 4)])
            .split(chunks[0]);

        frame.render_widget(PricePanel::new(views, self.colors), panels[0]);
        frame.render_widget(VolumePanel::new(views, self.colors), panels[1]);
        frame.render_widget(DateAxis::new(views, self.colors), chunks[1]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("Date", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" | Press 'q' to quit"),
        ]));
        frame.render_widget(help, chunks[2]);
    }
}
