use crate::{
    foundation::color::Rgba,
    foundation::geom::IntRect,
    gl::device::{BlendMode, DrawParams},
};

/// One render-state variable as a stack over a base value.
///
/// The base is never popped; `truncate` restores to a recorded depth.
#[derive(Debug)]
pub struct StateStack<T: Copy> {
    values: Vec<T>,
}

impl<T: Copy> StateStack<T> {
    pub fn new(base: T) -> Self {
        Self { values: vec![base] }
    }

    pub fn push(&mut self, value: T) {
        self.values.push(value);
    }

    pub fn pop(&mut self) {
        debug_assert!(self.values.len() > 1, "popping base render state");
        if self.values.len() > 1 {
            self.values.pop();
        }
    }

    pub fn current(&self) -> T {
        *self.values.last().expect("state stack holds its base value")
    }

    pub fn depth(&self) -> usize {
        self.values.len()
    }

    fn truncate(&mut self, depth: usize) {
        debug_assert!(depth >= 1 && depth <= self.values.len());
        self.values.truncate(depth.max(1));
    }
}

/// Process-wide render state: viewport, scissor, blend mode, clear color.
///
/// Mutations go through [`GlState::scope`], whose guard restores every stack
/// on drop, so early returns and error paths never leak state onto unrelated
/// later draws.
#[derive(Debug)]
pub struct GlState {
    pub viewport: StateStack<IntRect>,
    pub scissor_test: StateStack<bool>,
    pub scissor_box: StateStack<IntRect>,
    pub blend: StateStack<BlendMode>,
    pub clear_color: StateStack<Rgba>,
}

impl GlState {
    pub fn new() -> Self {
        Self {
            viewport: StateStack::new(IntRect::new(0, 0, 0, 0)),
            scissor_test: StateStack::new(false),
            scissor_box: StateStack::new(IntRect::new(0, 0, 0, 0)),
            blend: StateStack::new(BlendMode::Normal),
            clear_color: StateStack::new(Rgba::transparent()),
        }
    }

    /// Open a scoped mutation; everything pushed through the scope is popped
    /// when it drops.
    pub fn scope(&mut self) -> StateScope<'_> {
        let depths = [
            self.viewport.depth(),
            self.scissor_test.depth(),
            self.scissor_box.depth(),
            self.blend.depth(),
            self.clear_color.depth(),
        ];
        StateScope {
            state: self,
            depths,
        }
    }
}

impl Default for GlState {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard over [`GlState`]; see [`GlState::scope`].
#[derive(Debug)]
pub struct StateScope<'a> {
    state: &'a mut GlState,
    depths: [usize; 5],
}

impl StateScope<'_> {
    pub fn set_viewport(&mut self, rect: IntRect) {
        self.state.viewport.push(rect);
    }

    /// Enable the scissor test and set its box in one push pair.
    pub fn set_scissor(&mut self, rect: IntRect) {
        self.state.scissor_test.push(true);
        self.state.scissor_box.push(rect);
    }

    pub fn set_blend(&mut self, mode: BlendMode) {
        self.state.blend.push(mode);
    }

    pub fn set_clear_color(&mut self, color: Rgba) {
        self.state.clear_color.push(color);
    }

    pub fn clear_color(&self) -> Rgba {
        self.state.clear_color.current()
    }

    pub fn scissor(&self) -> Option<IntRect> {
        self.state
            .scissor_test
            .current()
            .then(|| self.state.scissor_box.current())
    }

    /// Snapshot of the current state for a draw call.
    pub fn params(&self) -> DrawParams {
        DrawParams {
            viewport: self.state.viewport.current(),
            scissor: self.scissor(),
            blend: self.state.blend.current(),
        }
    }
}

impl Drop for StateScope<'_> {
    fn drop(&mut self) {
        self.state.viewport.truncate(self.depths[0]);
        self.state.scissor_test.truncate(self.depths[1]);
        self.state.scissor_box.truncate(self.depths[2]);
        self.state.blend.truncate(self.depths[3]);
        self.state.clear_color.truncate(self.depths[4]);
    }
}
