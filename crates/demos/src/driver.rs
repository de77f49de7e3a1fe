use framelab_common::{DemoKind, LaunchConfig, Rgba, WindowSize};
use framelab_input::InputSnapshot;
use framelab_render::Frame;

use crate::camera::CameraDemo;
use crate::context::{AppContext, Demo, DemoError};
use crate::hello::HelloWorld;
use crate::physics::PhysicsSandbox;

/// Owns the application context and the one running demo.
///
/// Every call to [`FrameDriver::frame`] clears the frame, lets the demo
/// consume input and step, then has it draw.
pub struct FrameDriver {
    ctx: AppContext,
    demo: Box<dyn Demo>,
    frame: Frame,
}

impl FrameDriver {
    /// Validate the config and build the selected demo.
    pub fn new(config: LaunchConfig) -> Result<Self, DemoError> {
        config.validate()?;
        let kind = config.demo;
        let mut ctx = AppContext::new(config);
        let demo: Box<dyn Demo> = match kind {
            DemoKind::Physics => Box::new(PhysicsSandbox::new(&ctx)?),
            DemoKind::Camera => Box::new(CameraDemo::new(&mut ctx)?),
            DemoKind::Hello => Box::new(HelloWorld::new()),
        };
        tracing::info!(
            demo = demo.name(),
            width = ctx.window.width,
            height = ctx.window.height,
            "demo initialised"
        );
        Ok(Self {
            ctx,
            demo,
            frame: Frame::default(),
        })
    }

    /// Run one frame and return what to present.
    pub fn frame(&mut self, input: &InputSnapshot) -> Result<&Frame, DemoError> {
        let _span = tracing::info_span!("frame", index = self.ctx.frame_index).entered();
        self.frame.clear(Rgba::BLACK);
        self.demo.update(&mut self.ctx, input);
        self.demo.render(&self.ctx, &mut self.frame)?;
        self.ctx.frame_index += 1;
        Ok(&self.frame)
    }

    /// Track the drawable size; zero extents are raised to one pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.window = WindowSize::new(width.max(1), height.max(1));
        tracing::debug!(width, height, "resized");
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn demo(&self) -> &dyn Demo {
        self.demo.as_ref()
    }

    pub fn last_frame(&self) -> &Frame {
        &self.frame
    }
}
