use crate::error::GraphicsError;
use parking_lot::Mutex;
use sprig_test_utils::GpuTexture;
use std::sync::Arc;

/// A shared wgpu graphics context.
///
/// # Ownership Pattern
///
/// This type is handed out as `Arc<Self>`:
///
/// ```rust,no_run
/// use sprig_render::GraphicsContext;
///
/// let ctx = GraphicsContext::new_owned_sync().expect("no GPU adapter");
/// let ctx2 = ctx.clone(); // Cheap clone (Arc)
/// ```
///
/// Besides the raw wgpu handles, the context tracks the texture bound to each
/// sampler unit and the view that draws render into, so it can serve as the
/// [`RenderContext`](sprig_test_utils::RenderContext) of a sprite batch.
pub struct GraphicsContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub(crate) render_target: Mutex<Option<wgpu::TextureView>>,
    pub(crate) bound_units: Mutex<Vec<Option<GpuTexture>>>,
}

impl GraphicsContext {
    /// Creates a new graphics context with default settings.
    ///
    /// # Example
    /// ```rust,no_run
    /// use sprig_render::GraphicsContext;
    ///
    /// # async fn example() {
    /// let ctx = GraphicsContext::new_owned().await.unwrap();
    /// # }
    /// ```
    pub async fn new_owned() -> Result<Arc<Self>, GraphicsError> {
        Self::new_owned_with_descriptor(GraphicsContextDescriptor::default()).await
    }

    /// Creates a new graphics context synchronously.
    ///
    /// This blocks the current thread until the context is created.
    pub fn new_owned_sync() -> Result<Arc<Self>, GraphicsError> {
        pollster::block_on(Self::new_owned())
    }

    /// Creates a new graphics context with a custom descriptor.
    pub async fn new_owned_with_descriptor(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Arc<Self>, GraphicsError> {
        let context = Self::create_context_internal(descriptor).await?;
        Ok(Arc::new(context))
    }

    /// Creates a new graphics context with a custom descriptor, blocking the current thread.
    pub fn new_owned_with_descriptor_sync(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Arc<Self>, GraphicsError> {
        pollster::block_on(Self::new_owned_with_descriptor(descriptor))
    }

    async fn create_context_internal(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Self, GraphicsError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: descriptor.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: descriptor.power_preference,
                compatible_surface: None,
                force_fallback_adapter: descriptor.force_fallback_adapter,
            })
            .await
            .map_err(|_| GraphicsError::NoAdapter)?;

        // Without explicit limits, take everything the adapter offers so the
        // texture-slot capacity reflects the hardware.
        let required_limits = descriptor.limits.unwrap_or_else(|| adapter.limits());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_limits,
                label: descriptor.label,
                ..Default::default()
            })
            .await
            .map_err(|e| GraphicsError::DeviceRequest(e.to_string()))?;

        let info = adapter.get_info();
        tracing::info!(
            "Created graphics context on {} ({:?})",
            info.name,
            info.backend
        );

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            render_target: Mutex::new(None),
            bound_units: Mutex::new(Vec::new()),
        })
    }

    /// Get device info
    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Get device limits
    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    /// Set the view that subsequent draws render into.
    pub fn set_render_target(&self, view: wgpu::TextureView) {
        *self.render_target.lock() = Some(view);
    }

    /// Remove the current render target. Draws fail until a new one is set.
    pub fn clear_render_target(&self) {
        *self.render_target.lock() = None;
    }

    /// Whether a render target is currently set.
    pub fn has_render_target(&self) -> bool {
        self.render_target.lock().is_some()
    }

    /// Get the maximum sampled textures per shader stage.
    #[inline]
    pub fn max_sampled_textures_per_shader_stage(&self) -> u32 {
        self.device.limits().max_sampled_textures_per_shader_stage
    }

    /// Get the maximum uniform buffer binding size.
    #[inline]
    pub fn max_uniform_buffer_binding_size(&self) -> u32 {
        self.device.limits().max_uniform_buffer_binding_size
    }

    /// Get the maximum bindings per bind group.
    #[inline]
    pub fn max_bindings_per_bind_group(&self) -> u32 {
        self.device.limits().max_bindings_per_bind_group
    }

    /// Get the maximum 2D texture dimension.
    #[inline]
    pub fn max_texture_dimension_2d(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}

/// Descriptor for configuring graphics context creation.
pub struct GraphicsContextDescriptor {
    /// GPU backends to use
    pub backends: wgpu::Backends,
    /// Power preference for adapter selection
    pub power_preference: wgpu::PowerPreference,
    /// Whether to force fallback adapter
    pub force_fallback_adapter: bool,
    /// Required device limits. `None` requests the adapter's own limits.
    pub limits: Option<wgpu::Limits>,
    /// Optional label for debugging
    pub label: Option<&'static str>,
}

impl Default for GraphicsContextDescriptor {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            limits: None,
            label: None,
        }
    }
}

impl GraphicsContextDescriptor {
    /// Create a new descriptor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the power preference.
    pub fn power_preference(mut self, preference: wgpu::PowerPreference) -> Self {
        self.power_preference = preference;
        self
    }

    /// Set the backends to use.
    pub fn backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    /// Force the use of a fallback (software) adapter.
    pub fn force_fallback_adapter(mut self, force: bool) -> Self {
        self.force_fallback_adapter = force;
        self
    }

    /// Set the device limits.
    pub fn limits(mut self, limits: wgpu::Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Set the debug label.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }
}
