use framelab_assets::{AssetError, TextureStore};
use framelab_common::{ConfigError, LaunchConfig, OrthoCamera, WindowSize};
use framelab_input::InputSnapshot;
use framelab_kernel::{PhysicsWorld, WorldError};
use framelab_render::{Frame, RenderError};

/// Errors raised while building or running a demo.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
    #[error("world error: {0}")]
    World(#[from] WorldError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Host state handed to every demo entry point.
#[derive(Debug)]
pub struct AppContext {
    pub config: LaunchConfig,
    /// Current drawable size in pixels.
    pub window: WindowSize,
    pub textures: TextureStore,
    /// Frames completed so far.
    pub frame_index: u64,
}

impl AppContext {
    pub fn new(config: LaunchConfig) -> Self {
        Self {
            window: config.window_size(),
            config,
            textures: TextureStore::new(),
            frame_index: 0,
        }
    }
}

/// One runnable demo.
///
/// Construction is the init step; `update` and `render` run once per frame
/// in that order.
pub trait Demo {
    fn name(&self) -> &'static str;

    /// Consume input and advance any simulation by one frame.
    fn update(&mut self, ctx: &mut AppContext, input: &InputSnapshot);

    /// Draw into a frame that was cleared by the driver.
    fn render(&mut self, ctx: &AppContext, frame: &mut Frame) -> Result<(), RenderError>;

    fn camera(&self) -> &OrthoCamera;

    /// The physics world, for demos that own one.
    fn world(&self) -> Option<&PhysicsWorld> {
        None
    }
}
