use super::helpers::{self, DEPTH_FORMAT};

/// Offscreen attachments sized to the surface.
///
/// - `color_view` is the multisampled colour target resolved into the
///   swapchain after every pass (absent when rendering single-sampled).
/// - `depth_view` is shared by both passes; only its contents are cleared between them.
pub(crate) struct RenderTargets {
    pub(crate) sample_count: u32,
    pub(crate) color_view: Option<wgpu::TextureView>,
    pub(crate) depth_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        let color_view = (sample_count > 1).then(|| {
            helpers::create_render_texture(
                device,
                "msaa_color",
                width,
                height,
                color_format,
                sample_count,
            )
            .1
        });
        let (_, depth_view) =
            helpers::create_render_texture(device, "depth", width, height, DEPTH_FORMAT, sample_count);
        Self {
            sample_count,
            color_view,
            depth_view,
        }
    }

    pub(crate) fn recreate(
        &mut self,
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) {
        *self = Self::new(device, color_format, width, height, self.sample_count);
    }
}
