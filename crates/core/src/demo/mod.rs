//! The demo state: every table, surface and counter in one owned context,
//! advanced one fixed tick at a time.

pub mod intro;

use crate::{
    assets::DemoAssets,
    cursor::ScrollCursor,
    render::{
        compositor::{scroll_target, tile_background, FrameCompositor, FrameState, TEXT_STRIP_WIDTH},
        present::{DisplaySurface, FrameView, Presenter},
        sprites::{layout, Sprite, SPRITE_SPEED},
        Pixmap, BLACK, SCREEN_HEIGHT, SCREEN_WIDTH,
    },
    text::{banner_text, intro_text, Banner, GlyphMetrics, PositionTable, FONT_HEIGHT},
    timeline::{Phase, Transition, SPLASH_TICKS},
    wave::WaveTables,
    DemoConfig, DemoError, Result,
};
use intro::{IntroScroller, IntroStep};

#[derive(Debug)]
pub struct Demo {
    config: DemoConfig,
    tables: WaveTables,
    glyphs: GlyphMetrics,
    banner: Banner,
    intro_text: Banner,
    positions: PositionTable,
    cursor: ScrollCursor,

    background_tile_width: u32,
    font: Pixmap,
    logo: Pixmap,
    back_surface: Pixmap,
    strip: Pixmap,
    main: Pixmap,

    intro: IntroScroller,
    phase: Phase,
    splash_ticks: u64,
    transition: Transition,
    frame: FrameState,
    sprite_counter: f64,
}

impl Demo {
    /// Builds the demo with the stock banner and intro texts.
    pub fn new(config: DemoConfig, assets: DemoAssets) -> Result<Self> {
        Self::with_texts(config, assets, &banner_text(), &intro_text())
    }

    /// Precomputes every table for `config` and prepares the surfaces.
    pub fn with_texts(config: DemoConfig, assets: DemoAssets, banner: &str, intro: &str) -> Result<Self> {
        let glyphs = GlyphMetrics::standard();
        let banner = Banner::new(banner, &glyphs);
        if banner.is_empty() {
            return Err(DemoError::InvalidInput(
                "banner text has no characters the font can draw",
            ));
        }
        let intro_text = Banner::new(intro, &glyphs);
        let positions = PositionTable::build(&banner, &glyphs);
        let tables = WaveTables::generate(config.distortion_rate);

        tracing::info!(
            banner_chars = banner.len(),
            banner_width = positions.position_of(positions.len() as isize),
            front_table = tables.foreground.intro.len() + tables.foreground.main.len(),
            back_table = tables.background.intro.len() + tables.background.main.len(),
            "wave tables ready"
        );

        let DemoAssets {
            background,
            font,
            logo,
            ..
        } = assets;

        Ok(Self {
            config,
            tables,
            glyphs,
            banner,
            intro_text,
            positions,
            cursor: ScrollCursor::new(),
            background_tile_width: background.width(),
            back_surface: tile_background(&background),
            font,
            logo,
            strip: Pixmap::new(TEXT_STRIP_WIDTH, FONT_HEIGHT),
            main: Pixmap::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            intro: IntroScroller::new(),
            phase: Phase::Intro,
            splash_ticks: 0,
            transition: Transition::default(),
            frame: FrameState::default(),
            sprite_counter: 0.0,
        })
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tables(&self) -> &WaveTables {
        &self.tables
    }

    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    pub fn cursor(&self) -> &ScrollCursor {
        &self.cursor
    }

    pub fn frame_state(&self) -> &FrameState {
        &self.frame
    }

    /// The logical 416x276 frame produced by the last tick.
    pub fn frame(&self) -> &Pixmap {
        &self.main
    }

    /// Jumps straight to the main screen.
    pub fn skip_intro(&mut self) {
        self.enter(Phase::Demo);
    }

    /// Advances the simulation by one fixed tick and redraws the logical
    /// frame.
    pub fn update(&mut self) {
        match self.phase {
            Phase::Intro => self.update_intro(),
            Phase::Splash => self.update_splash(),
            Phase::Demo => self.update_demo(),
        }
        self.transition.tick();
    }

    /// Current sprite positions.
    pub fn sprites(&self) -> Vec<Sprite> {
        layout(self.config.sprites(), self.sprite_counter)
    }

    /// Composes the presented image for the current state.
    pub fn draw(&self, presenter: &Presenter) -> Pixmap {
        let sprites = self.sprites();
        presenter.compose(&self.view(&sprites))
    }

    pub fn present(&self, presenter: &Presenter, surface: &mut dyn DisplaySurface) -> Result<()> {
        let sprites = self.sprites();
        presenter.present(&self.view(&sprites), surface)
    }

    fn view<'a>(&'a self, sprites: &'a [Sprite]) -> FrameView<'a> {
        FrameView {
            main: &self.main,
            phase: self.phase,
            sprites,
            logo: &self.logo,
            fade: self.transition.overlay_alpha(),
        }
    }

    fn enter(&mut self, phase: Phase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "phase change");
        self.phase = phase;
        self.transition.reset();
        match phase {
            Phase::Intro => self.intro = IntroScroller::new(),
            Phase::Splash => self.splash_ticks = 0,
            Phase::Demo => {
                self.frame = FrameState::default();
                self.cursor = ScrollCursor::new();
            }
        }
    }

    fn update_intro(&mut self) {
        match self.intro.step(&self.intro_text, &self.glyphs, &self.font) {
            IntroStep::Running => self.intro.draw_into(&mut self.main),
            IntroStep::Finished => self.enter(Phase::Splash),
        }
    }

    fn update_splash(&mut self) {
        if self.splash_ticks < SPLASH_TICKS {
            self.splash_ticks += 1;
            self.transition
                .set(self.splash_ticks as f64 / SPLASH_TICKS as f64);
        } else {
            self.enter(Phase::Demo);
        }
        self.main.fill(BLACK);
    }

    fn update_demo(&mut self) {
        let decal_x = scroll_target(&self.tables.foreground, self.frame.front_wave_pos, SCREEN_HEIGHT);
        self.cursor.track(&self.positions, decal_x);
        self.frame.letter_decal = self.cursor.letter_decal();

        self.banner
            .render_strip(&mut self.strip, &self.font, &self.glyphs, self.cursor.index());
        FrameCompositor::new(
            &self.tables,
            &self.back_surface,
            self.background_tile_width,
            &self.strip,
        )
        .composite(&self.frame, &mut self.main);

        self.frame.advance();
        self.sprite_counter += SPRITE_SPEED;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{present::NullSurface, ZOOM};

    fn assets() -> DemoAssets {
        DemoAssets {
            background: Pixmap::filled(8, 64, [64, 32, 128, 255]),
            font: Pixmap::filled(480, 216, [255, 255, 255, 255]),
            logo: Pixmap::filled(32, 32, [255, 255, 0, 255]),
            music: None,
        }
    }

    #[test]
    fn walks_through_intro_splash_and_demo() {
        let mut demo = Demo::with_texts(DemoConfig::default(), assets(), &banner_text(), "AB").unwrap();
        let mut phases = vec![demo.phase()];
        for _ in 0..200 {
            demo.update();
            if phases.last() != Some(&demo.phase()) {
                phases.push(demo.phase());
            }
        }
        assert_eq!(phases, vec![Phase::Intro, Phase::Splash, Phase::Demo]);
        assert!(demo.frame_state().iteration > 0);
    }

    #[test]
    fn splash_fades_over_ninety_ticks() {
        let mut demo = Demo::new(DemoConfig::default(), assets()).unwrap();
        demo.enter(Phase::Splash);

        demo.update();
        // 1/90 from the splash counter plus one transition tick.
        assert_eq!(demo.transition.overlay_alpha(), Some(247));
        for _ in 1..SPLASH_TICKS {
            assert_eq!(demo.phase(), Phase::Splash);
            demo.update();
        }
        assert_eq!(demo.phase(), Phase::Splash);
        demo.update();
        assert_eq!(demo.phase(), Phase::Demo);
        assert_eq!(demo.frame().pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn cursor_covers_the_scroll_target_every_frame() {
        let mut demo = Demo::new(DemoConfig::default(), assets()).unwrap();
        demo.skip_intro();
        let total = demo.positions().position_of(demo.positions().len() as isize);

        for _ in 0..400 {
            let decal_x = scroll_target(
                &demo.tables().foreground,
                demo.frame_state().front_wave_pos,
                SCREEN_HEIGHT,
            );
            demo.update();
            if decal_x < total {
                let index = demo.cursor().index() as isize;
                assert!(demo.positions().position_of(index) <= decal_x);
                assert!(decal_x < demo.positions().position_of(index + 1));
            }
        }
        assert_eq!(demo.frame_state().iteration, 400);
    }

    #[test]
    fn identical_setups_render_identical_frames() {
        let mut first = Demo::new(DemoConfig::default(), assets()).unwrap();
        let mut second = Demo::new(DemoConfig::default(), assets()).unwrap();
        first.skip_intro();
        second.skip_intro();
        for _ in 0..50 {
            first.update();
            second.update();
        }
        assert_eq!(first.frame(), second.frame());
        assert_eq!(first.cursor(), second.cursor());
    }

    #[test]
    fn draws_zoomed_frames_with_sprites() {
        let config = DemoConfig {
            sprite_count: 3,
            ..DemoConfig::default()
        };
        let presenter = Presenter::new(&config);
        let mut demo = Demo::new(config, assets()).unwrap();
        demo.skip_intro();
        demo.update();

        assert_eq!(demo.sprites().len(), 3);
        let image = demo.draw(&presenter);
        assert_eq!(image.width(), SCREEN_WIDTH * ZOOM);
        assert_eq!(image.height(), SCREEN_HEIGHT * ZOOM);

        let sprite = demo.sprites()[0];
        let (x, y) = ((sprite.x * ZOOM as f64) as u32, (sprite.y * ZOOM as f64) as u32);
        assert_eq!(image.pixel(x, y), Some([255, 255, 0, 255]));
        demo.present(&presenter, &mut NullSurface).unwrap();
    }

    #[test]
    fn rejects_a_banner_the_font_cannot_draw() {
        let err = Demo::with_texts(DemoConfig::default(), assets(), "~~~", "").unwrap_err();
        assert!(matches!(err, DemoError::InvalidInput(_)));
    }
}
