use eframe::{egui, egui_wgpu::CallbackTrait, App, Frame};
use parking_lot::Mutex;
use point_sphere::config::SphereConfig;
use point_sphere::visualization::renderer::{
    PointCloudRenderer, SphereGpuPrimitive, SphereUniforms,
};
use point_sphere::visualization::sphere_geometry::generate_sphere_points;
use point_sphere::visualization::viewport::{aspect_ratio, letterbox};
use std::sync::Arc;
use type_map::concurrent::TypeMap;

const MAX_POINTS: usize = 5000;

struct PointSpherePaintCallback {
    primitive: Arc<SphereGpuPrimitive>,
    uniforms: SphereUniforms,
    queue: Arc<wgpu::Queue>,
}

impl CallbackTrait for PointSpherePaintCallback {
    fn paint<'a>(
        &'a self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'a>,
        _resources: &'a TypeMap,
    ) {
        PointCloudRenderer::paint_primitive(
            &self.primitive,
            &self.uniforms,
            render_pass,
            &self.queue,
        );
    }
}

// Only count, scale and spread change the points themselves; everything
// else is a uniform tweak.
fn needs_regeneration(current: &SphereConfig, next: &SphereConfig) -> bool {
    current.point_count != next.point_count
        || current.scale != next.scale
        || current.spread() != next.spread()
}

pub struct PointSphereApp {
    // Last configuration that generated successfully
    config: SphereConfig,
    // What the side panel is editing
    draft: SphereConfig,
    manual_spread: f32,
    paused: bool,
    action_error_message: Option<String>,
    sphere_renderer: Arc<Mutex<PointCloudRenderer>>,
    wgpu_device: Option<Arc<wgpu::Device>>,
    wgpu_queue: Option<Arc<wgpu::Queue>>,
    target_format: Option<wgpu::TextureFormat>,
}

impl PointSphereApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: SphereConfig) -> Self {
        let mut action_error_message = None;
        let sphere_points = generate_sphere_points(&config).unwrap_or_else(|e| {
            tracing::error!("Failed to generate sphere points: {}", e);
            action_error_message = Some(e.to_string());
            Vec::new()
        });

        let mut local_sphere_renderer = PointCloudRenderer::new(sphere_points, &config);
        let mut app_wgpu_device_arc = None;
        let mut app_wgpu_queue_arc = None;
        let mut app_target_format = None;
        if let Some(wgpu_render_state) = &cc.wgpu_render_state {
            let device_arc = wgpu_render_state.device.clone();
            let queue_arc = wgpu_render_state.queue.clone();
            let target_format = wgpu_render_state.target_format;
            if let Err(e) = local_sphere_renderer.prepare(&device_arc, target_format) {
                tracing::error!("Failed to prepare WGPU sphere renderer: {}", e);
            }
            app_wgpu_device_arc = Some(device_arc);
            app_wgpu_queue_arc = Some(queue_arc);
            app_target_format = Some(target_format);
        } else {
            tracing::warn!("WGPU render state not available at creation.");
        }

        Self {
            config,
            draft: config,
            manual_spread: config.spread(),
            paused: false,
            action_error_message,
            sphere_renderer: Arc::new(Mutex::new(local_sphere_renderer)),
            wgpu_device: app_wgpu_device_arc,
            wgpu_queue: app_wgpu_queue_arc,
            target_format: app_target_format,
        }
    }

    fn apply_draft(&mut self) {
        if self.draft == self.config {
            return;
        }
        if let Err(e) = self.draft.validate() {
            self.action_error_message = Some(e.to_string());
            return;
        }

        let mut renderer = self.sphere_renderer.lock();
        if needs_regeneration(&self.config, &self.draft) {
            match generate_sphere_points(&self.draft) {
                Ok(points) => {
                    tracing::info!(
                        "Regenerated {} points (scale {}, spread {})",
                        points.len(),
                        self.draft.scale,
                        self.draft.spread()
                    );
                    renderer.set_points(points);
                }
                Err(e) => {
                    tracing::warn!("Keeping previous points: {}", e);
                    self.action_error_message = Some(e.to_string());
                    return;
                }
            }
        }
        renderer.apply_config(&self.draft);

        if let (Some(device), Some(format)) = (&self.wgpu_device, self.target_format) {
            if let Err(e) = renderer.prepare(device, format) {
                tracing::error!("Failed to upload sphere points: {}", e);
                self.action_error_message = Some(e.to_string());
                return;
            }
        }

        self.config = self.draft;
        self.action_error_message = None;
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Point Sphere");
        ui.separator();

        ui.add(egui::Slider::new(&mut self.draft.point_count, 2..=MAX_POINTS).text("Points"));
        ui.add(egui::Slider::new(&mut self.draft.scale, 0.1..=1.0).text("Scale"));

        let mut auto_spread = self.draft.spread_override.is_none();
        ui.checkbox(&mut auto_spread, "Auto spread");
        if auto_spread {
            self.draft.spread_override = None;
            ui.label(format!("Spread: {:.2}", self.draft.spread()));
        } else {
            ui.add(
                egui::DragValue::new(&mut self.manual_spread)
                    .speed(0.5)
                    .prefix("Spread: "),
            );
            self.draft.spread_override = Some(self.manual_spread);
        }

        ui.separator();
        ui.add(
            egui::Slider::new(&mut self.draft.point_size, 0.002..=0.05)
                .text("Point size")
                .min_decimals(3),
        );
        ui.add(egui::Slider::new(&mut self.draft.depth_falloff, 0.0..=1.0).text("Depth falloff"));
        ui.add(egui::Slider::new(&mut self.draft.rotation_speed, -2.0..=2.0).text("Rotation"));
        ui.checkbox(&mut self.paused, "Pause");
        ui.checkbox(&mut self.draft.letterbox, "Letterbox");

        if ui.button("Reset").clicked() {
            self.draft = SphereConfig::default();
            self.manual_spread = self.draft.spread();
        }

        ui.separator();
        let status_message = match &self.action_error_message {
            Some(err_msg) => format!("Error: {}", err_msg),
            None => format!(
                "{} points, spread {:.2}",
                self.config.point_count,
                self.config.spread()
            ),
        };
        ui.label(status_message);
    }
}

impl App for PointSphereApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            tracing::info!("Escape pressed, closing window");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        if !self.paused {
            self.sphere_renderer.lock().time += ctx.input(|i| i.stable_dt);
        }

        egui::SidePanel::left("controls")
            .resizable(false)
            .show(ctx, |ui| self.controls_ui(ui));

        self.apply_draft();

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_rect_before_wrap();
            let rect = if self.config.letterbox {
                letterbox(available)
            } else {
                available
            };
            ui.allocate_rect(available, egui::Sense::hover());

            let (primitive_option, uniforms) = {
                let renderer_guard = self.sphere_renderer.lock();
                (
                    renderer_guard.get_primitive_arc(),
                    renderer_guard.calculate_uniforms(aspect_ratio(rect)),
                )
            };

            match (primitive_option, &self.wgpu_queue) {
                (Some(primitive), Some(queue_arc)) => {
                    let cb = eframe::egui_wgpu::Callback::new_paint_callback(
                        rect,
                        PointSpherePaintCallback {
                            primitive,
                            uniforms,
                            queue: queue_arc.clone(),
                        },
                    );
                    ui.painter().add(cb);
                }
                (primitive, _) => {
                    let text = if primitive.is_some() {
                        "WGPU Queue N/A"
                    } else {
                        "Renderer N/A"
                    };
                    ui.painter().rect_filled(rect, 0.0, egui::Color32::DARK_GRAY);
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        text,
                        egui::FontId::default(),
                        egui::Color32::WHITE,
                    );
                }
            }
        });

        ctx.request_repaint();
    }
}
