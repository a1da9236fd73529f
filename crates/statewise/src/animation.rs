use glam::IVec2;
use statewise_macros::WithSetters;

use crate::style::AssetHandle;

/// What happens after the last frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnimationEnd {
    /// Start over from the first frame
    #[default]
    Loop,
    /// Stay on the last frame and report the animation as finished
    Hold,
}

/// Frame-by-frame animation over opaque frame handles
///
/// Each call to [`FrameAnimation::tick`] is one step; a frame is shown for
/// `speed` steps.
#[derive(Debug, Clone, PartialEq, WithSetters)]
pub struct FrameAnimation {
    #[setters(skip)]
    frames: Vec<AssetHandle>,
    /// Steps each frame is held (values below 1 count as 1)
    pub speed: u32,
    /// Inclusive `(first, last)` frame range repeated instead of the whole animation
    pub loop_range: Option<(usize, usize)>,
    pub end: AnimationEnd,
    /// Offset applied to every frame when drawn
    pub offset: IVec2,
    /// Per-frame offsets, indexed like the frames
    pub offsets: Vec<IVec2>,

    #[setters(skip)]
    frame_index: usize,
    #[setters(skip)]
    ticks_since_frame: u32,
    #[setters(skip)]
    finished: bool,
}

impl FrameAnimation {
    pub fn new(frames: impl IntoIterator<Item = AssetHandle>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            speed: 1,
            loop_range: None,
            end: AnimationEnd::Loop,
            offset: IVec2::ZERO,
            offsets: Vec::new(),
            frame_index: 0,
            ticks_since_frame: 0,
            finished: false,
        }
    }

    /// Advance one step, returns `true` when the displayed frame changed
    pub fn tick(&mut self) -> bool {
        if self.finished || self.frames.len() < 2 {
            return false;
        }

        self.ticks_since_frame += 1;
        if self.ticks_since_frame < self.speed.max(1) {
            return false;
        }
        self.ticks_since_frame = 0;

        let previous = self.frame_index;
        self.frame_index += 1;

        match self.loop_range {
            Some((first, last)) if self.frame_index > last => {
                self.frame_index = first.min(self.frames.len() - 1);
            }
            _ if self.frame_index >= self.frames.len() => match self.end {
                AnimationEnd::Loop => self.frame_index = 0,
                AnimationEnd::Hold => {
                    self.frame_index = self.frames.len() - 1;
                    self.finished = true;
                }
            },
            _ => {}
        }

        self.frame_index != previous
    }

    /// Handle of the frame currently shown
    pub fn frame(&self) -> Option<AssetHandle> {
        self.frames.get(self.frame_index).copied()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frames(&self) -> &[AssetHandle] {
        &self.frames
    }

    /// Draw offset of the current frame
    pub fn current_offset(&self) -> IVec2 {
        self.offset + self.offsets.get(self.frame_index).copied().unwrap_or(IVec2::ZERO)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Back to the first frame
    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.ticks_since_frame = 0;
        self.finished = false;
    }
}
