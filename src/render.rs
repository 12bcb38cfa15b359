//! Presentation: a half-block pixel buffer, a tiny bitmap font, the
//! game-over layout, and a pure `draw` from session state to pixels.

use crate::config::{Surface, Tuning};
use crate::session::{Phase, Session};
use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    /// Keep `keep_256`/256 of each channel.
    const fn dim(self, keep_256: u16) -> Rgb {
        let k = keep_256 as u32;
        Rgb(
            (self.0 as u32 * k / 256) as u8,
            (self.1 as u32 * k / 256) as u8,
            (self.2 as u32 * k / 256) as u8,
        )
    }
}

pub const SKY_TOP: Rgb = Rgb(70, 180, 200);
pub const SKY_BOT: Rgb = Rgb(190, 232, 245);
pub const GRASS: Rgb = Rgb(84, 168, 55);
pub const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
pub const DIRT: Rgb = Rgb(210, 185, 110);
pub const DIRT_DARK: Rgb = Rgb(185, 160, 90);
pub const PIPE_L: Rgb = Rgb(74, 122, 26);
pub const PIPE_M: Rgb = Rgb(100, 170, 40);
pub const PIPE_R: Rgb = Rgb(115, 191, 46);
pub const PIPE_HI: Rgb = Rgb(145, 215, 62);
pub const BODY: Rgb = Rgb(245, 200, 66);
pub const BODY_HI: Rgb = Rgb(255, 225, 100);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const SHADOW: Rgb = Rgb(30, 30, 30);
pub const INK: Rgb = Rgb(0, 0, 0);
pub const BUTTON: Rgb = Rgb(255, 204, 0);
pub const PANEL: Rgb = Rgb(220, 195, 120);

/// Overlay behind the game-over panel keeps 30% of the scene.
const OVERLAY_KEEP: u16 = 77;

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Fill a rectangle in surface coordinates.
    pub fn fill_rect_f(&mut self, x: f64, y: f64, w: f64, h: f64, c: Rgb) {
        let (x0, x1) = span(x, w);
        let (y0, y1) = span(y, h);
        self.fill_rect(x0, y0, x1 - x0, y1 - y0, c);
    }

    fn dim_all(&mut self, keep_256: u16) {
        for c in &mut self.px {
            *c = c.dim(keep_256);
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        if rows == 0 {
            return out.flush();
        }
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(term_color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row < rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

/// Pixel span covering `[a, a + len)`, at least one pixel wide when `len > 0`.
fn span(a: f64, len: f64) -> (i32, i32) {
    let lo = a.round() as i32;
    let hi = (a + len).round() as i32;
    if len > 0.0 { (lo, hi.max(lo + 1)) } else { (lo, lo) }
}

// ── 3x5 bitmap font ─────────────────────────────────────────────────────────

const GLYPH_H: i32 = 5;
const ADVANCE: i32 = 4;

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn glyph(ch: char) -> Option<[u8; 15]> {
    let g = match ch.to_ascii_uppercase() {
        d @ '0'..='9' => DIGITS[(d as u8 - b'0') as usize],
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'B' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0],
        'C' => [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'G' => [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1],
        'M' => [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1],
        'O' => [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        '!' => [0,1,0, 0,1,0, 0,1,0, 0,0,0, 0,1,0],
        ':' => [0,0,0, 0,1,0, 0,0,0, 0,1,0, 0,0,0],
        _ => return None,
    };
    Some(g)
}

/// Width in pixels of `text` set in the bitmap font.
pub fn text_width(text: &str) -> f64 {
    (text.chars().count() as i32 * ADVANCE - 1).max(0) as f64
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, g: &[u8; 15], fg: Rgb) {
    for row in 0..5 {
        for col in 0..3 {
            if g[row * 3 + col] == 1 {
                buf.set(x + col as i32, y + row as i32, fg);
            }
        }
    }
}

/// Draw `text` horizontally centered on `cx` with its top at `y`. Characters
/// without a glyph render as spaces.
fn draw_text(buf: &mut PixelBuf, cx: f64, y: f64, text: &str, fg: Rgb, shadow: bool) {
    let start_x = (cx - text_width(text) / 2.0).round() as i32;
    let y = y.round() as i32;
    // Shadow pass first so it never covers a neighbouring glyph
    if shadow {
        for (i, ch) in text.chars().enumerate() {
            if let Some(g) = glyph(ch) {
                draw_glyph(buf, start_x + i as i32 * ADVANCE + 1, y + 1, &g, SHADOW);
            }
        }
    }
    for (i, ch) in text.chars().enumerate() {
        if let Some(g) = glyph(ch) {
            draw_glyph(buf, start_x + i as i32 * ADVANCE, y, &g, fg);
        }
    }
}

// ── Layout ──────────────────────────────────────────────────────────────────

pub const RESTART_LABEL: &str = "RESTART";
pub const GAME_OVER_LABEL: &str = "GAME OVER!";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Edges inclusive.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// Where the game-over panel's pieces go, derived from the current surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOverLayout {
    pub panel: Rect,
    pub title_y: f64,
    pub score_y: f64,
    pub best_y: f64,
    pub button: Rect,
}

pub fn game_over_layout(surface: Surface, tuning: &Tuning) -> GameOverLayout {
    let cx = surface.center_x();
    let cy = surface.center_y();
    let line = (40.0 * tuning.scale).max(GLYPH_H as f64 + 2.0);

    let button_w = tuning.button_width.max(text_width(RESTART_LABEL) + 6.0);
    let button_h = tuning.button_height.max(GLYPH_H as f64 + 4.0);
    let button = Rect {
        x: cx - button_w / 2.0,
        y: cy + tuning.button_offset_y.max(line + 2.0),
        w: button_w,
        h: button_h,
    };

    let title_y = cy - 2.0 * line;
    let pad = (10.0 * tuning.scale).max(3.0);
    let panel_w = button_w.max(text_width("BEST: 00000")) + 2.0 * pad;
    let panel = Rect {
        x: cx - panel_w / 2.0,
        y: title_y - pad,
        w: panel_w,
        h: button.y + button.h + pad - (title_y - pad),
    };

    GameOverLayout {
        panel,
        title_y,
        score_y: cy - line,
        best_y: cy,
        button,
    }
}

/// Hit box of the restart control.
pub fn restart_button(surface: Surface, tuning: &Tuning) -> Rect {
    game_over_layout(surface, tuning).button
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Paint the whole frame for the session's current state.
pub fn draw(session: &Session, buf: &mut PixelBuf) {
    draw_sky(session, buf);
    draw_obstacles(session, buf);
    let ground_y = session.tuning().ground_line(session.surface());
    draw_ground(buf, ground_y, session.distance());
    draw_body(session, buf);

    match session.phase() {
        Phase::Playing => draw_score(session, buf),
        Phase::GameOver => draw_game_over(session, buf),
    }
}

fn draw_sky(session: &Session, buf: &mut PixelBuf) {
    let sky_h = session
        .tuning()
        .ground_line(session.surface())
        .max(0.0)
        .round() as usize;
    let sky_h = sky_h.min(buf.height());
    for y in 0..sky_h {
        let t = ((y * 256) / sky_h.max(1)) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..buf.width() {
            buf.set(x as i32, y as i32, c);
        }
    }
}

fn draw_obstacles(session: &Session, buf: &mut PixelBuf) {
    let tuning = session.tuning();
    for o in session.obstacles.iter() {
        let (x0, x1) = span(o.x, tuning.pipe_width);
        let (top0, top1) = span(0.0, o.gap_top);
        let (bot0, bot1) = span(o.gap_bottom(tuning.gap), o.bottom_height);
        for x in x0..x1 {
            let c = pipe_shade(x - x0, x1 - x0);
            for y in top0..top1 {
                buf.set(x, y, c);
            }
            for y in bot0..bot1 {
                buf.set(x, y, c);
            }
        }
    }
}

/// Ground texture at column `x`, `depth` pixels below the ground line.
/// The grass band scrolls with `scroll`; the dirt stripes lag behind it.
fn ground_color(x: i32, depth: i32, scroll: f64) -> Rgb {
    match depth {
        0 if (x + scroll as i32).div_euclid(3) % 2 == 0 => GRASS,
        0 => GRASS_LIGHT,
        1 => GRASS,
        _ if (x + (scroll * 0.8) as i32 + depth * 2).rem_euclid(12) < 6 => DIRT,
        _ => DIRT_DARK,
    }
}

fn draw_ground(buf: &mut PixelBuf, ground_y: f64, scroll: f64) {
    let top = ground_y.round() as i32;
    for y in top.max(0)..buf.height() as i32 {
        for x in 0..buf.width() as i32 {
            buf.set(x, y, ground_color(x, y - top, scroll));
        }
    }
}

fn draw_body(session: &Session, buf: &mut PixelBuf) {
    let b = &session.body;
    buf.fill_rect_f(b.x, b.y, b.width, b.height, BODY);
    if b.height >= 2.0 {
        buf.fill_rect_f(b.x, b.y, b.width, 1.0, BODY_HI);
    }
}

fn draw_score(session: &Session, buf: &mut PixelBuf) {
    let s = session.surface();
    let text = session.score().to_string();
    draw_text(buf, s.center_x(), s.center_y() - GLYPH_H as f64 / 2.0, &text, WHITE, true);
}

fn draw_game_over(session: &Session, buf: &mut PixelBuf) {
    let s = session.surface();
    let layout = game_over_layout(s, session.tuning());
    let cx = s.center_x();

    buf.dim_all(OVERLAY_KEEP);

    let p = layout.panel;
    buf.fill_rect_f(p.x - 1.0, p.y - 1.0, p.w + 2.0, p.h + 2.0, SHADOW);
    buf.fill_rect_f(p.x, p.y, p.w, p.h, DIRT);
    buf.fill_rect_f(p.x + 1.0, p.y + 1.0, p.w - 2.0, p.h - 2.0, PANEL);

    draw_text(buf, cx, layout.title_y, GAME_OVER_LABEL, WHITE, true);
    draw_text(
        buf,
        cx,
        layout.score_y,
        &format!("SCORE: {}", session.score()),
        WHITE,
        true,
    );
    draw_text(
        buf,
        cx,
        layout.best_y,
        &format!("BEST: {}", session.best_score()),
        BODY,
        true,
    );

    let b = layout.button;
    buf.fill_rect_f(b.x, b.y, b.w, b.h, BUTTON);
    draw_text(
        buf,
        cx,
        b.y + (b.h - GLYPH_H as f64) / 2.0,
        RESTART_LABEL,
        INK,
        false,
    );
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}
