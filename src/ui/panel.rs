// src/ui/panel.rs
//! Particle editor panel
//!
//! Live tuning for every emitter in the demo scene: active toggles, spawn
//! parameters, manual triggers and the automatic trigger timers.

use imgui::{Condition, TreeNodeFlags, Ui};

use crate::demo::DemoScene;
use crate::particles::ParticleEmitter;

/// Main particle editor window
///
/// # Arguments
/// * `ui` - ImGui UI context
/// * `scene` - Demo scene whose emitters are edited in place
pub fn particle_editor_panel(ui: &Ui, scene: &mut DemoScene) {
    let display_size = ui.io().display_size;
    // Guard against invalid display size that could cause crashes
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }
    let panel_height = (display_size[1] * 0.8).max(400.0);

    ui.window("Particle Editor")
        .size([360.0, panel_height], Condition::FirstUseEver)
        .position([20.0, 20.0], Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            ui.text(format!("Live particles: {}", scene.particle_count()));
            ui.separator();

            render_fire_controls(ui, scene);
            render_spark_controls(ui, scene);
            render_star_controls(ui, scene);
            render_snow_controls(ui, scene);
        });
}

/// Active checkbox plus pool usage, shared by every emitter section
fn render_emitter_header(ui: &Ui, id: &str, emitter: &mut dyn ParticleEmitter) {
    let mut active = emitter.is_active();
    if ui.checkbox(format!("Active##{}", id), &mut active) {
        emitter.set_active(active);
    }
    ui.same_line();
    ui.text(format!(
        "{}/{} particles",
        emitter.particles().len(),
        emitter.max_particles()
    ));
}

fn render_fire_controls(ui: &Ui, scene: &mut DemoScene) {
    if !ui.collapsing_header("Fire", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    let mut fire = scene.fire().borrow_mut();
    render_emitter_header(ui, "fire", &mut *fire);

    let mut settings = fire.settings().clone();
    ui.slider("Flame Height", 0.1, 1.5, &mut settings.flame_height);
    ui.slider("Flame Width", 0.05, 1.0, &mut settings.flame_width);
    ui.slider("Intensity##fire", 0.0, 3.0, &mut settings.intensity);
    ui.slider("Drip Interval", 0.002, 0.1, &mut settings.emission_rate);

    if settings != *fire.settings() {
        fire.set_flame_height(settings.flame_height);
        fire.set_flame_width(settings.flame_width);
        fire.set_intensity(settings.intensity);
        fire.set_emission_rate(settings.emission_rate);
    }
}

fn render_spark_controls(ui: &Ui, scene: &mut DemoScene) {
    if !ui.collapsing_header("Electric Sparks", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    {
        let mut sparks = scene.sparks().borrow_mut();
        render_emitter_header(ui, "spark", &mut *sparks);

        let mut radius = sparks.settings().spark_radius;
        if ui.slider("Radius", 0.0, 1.0, &mut radius) {
            sparks.set_spark_radius(radius);
        }
        let mut intensity = sparks.settings().spark_intensity;
        if ui.slider("Intensity##spark", 0.1, 3.0, &mut intensity) {
            sparks.set_spark_intensity(intensity);
        }
        let mut continuous = sparks.is_continuous();
        if ui.checkbox("Continuous", &mut continuous) {
            sparks.set_continuous(continuous);
        }
    }

    if ui.button("Spark") {
        scene.spark_at_emitter();
    }
    ui.same_line();
    if ui.button("Spark Anywhere") {
        scene.spark_at_random_point();
    }

    ui.checkbox("Auto Sparks", &mut scene.auto_sparks);
    ui.slider("Spark Interval", 0.1, 5.0, &mut scene.spark_interval);
}

fn render_star_controls(ui: &Ui, scene: &mut DemoScene) {
    if !ui.collapsing_header("Shooting Star", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    {
        let mut star = scene.star().borrow_mut();
        render_emitter_header(ui, "star", &mut *star);

        let mut trail_length = star.settings().trail_length;
        if ui.slider("Trail Length", 1, 30, &mut trail_length) {
            star.set_trail_length(trail_length);
        }
        let mut star_size = star.settings().star_size;
        if ui.slider("Star Size", 0.01, 0.2, &mut star_size) {
            star.set_star_size(star_size);
        }
        ui.text(if star.is_star_active() {
            "Star in flight"
        } else {
            "No star"
        });
    }

    if ui.button("Launch Star") {
        scene.launch_random_star();
    }

    ui.checkbox("Auto Launch", &mut scene.auto_launch_stars);
    ui.slider("Launch Interval", 0.5, 10.0, &mut scene.star_interval);
    ui.slider("Star Speed", 0.2, 3.0, &mut scene.star_speed);
}

fn render_snow_controls(ui: &Ui, scene: &mut DemoScene) {
    if !ui.collapsing_header("Snow", TreeNodeFlags::empty()) {
        return;
    }

    let mut snow = scene.snow().borrow_mut();
    render_emitter_header(ui, "snow", &mut *snow);

    let mut fall_speed = snow.settings().fall_speed;
    if ui.slider("Fall Speed", 0.05, 1.0, &mut fall_speed) {
        snow.set_fall_speed(fall_speed);
    }
    let mut interval = snow.settings().emission_interval;
    if ui.slider("Flake Interval", 0.005, 0.2, &mut interval) {
        snow.set_emission_interval(interval);
    }
}
