//! Frame timing and particle batch statistics for the diagnostics overlay
//!
//! ```no_run
//! use embers::performance::PerformanceMonitor;
//!
//! let mut monitor = PerformanceMonitor::new();
//! monitor.begin_frame();
//! // update the scene, draw the batch
//! monitor.update_render_stats(1, 600, 100);
//! monitor.end_frame();
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame and batch metrics
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    /// Current frames per second
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    /// Minimum frame time in the current window
    pub min_frame_time_ms: f32,
    /// Maximum frame time in the current window
    pub max_frame_time_ms: f32,
    /// Number of draw calls in the last frame
    pub draw_calls: u32,
    /// Number of vertices rendered in the last frame
    pub vertex_count: u32,
    /// Particles alive across all emitters in the last frame
    pub particle_count: usize,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
            draw_calls: 0,
            vertex_count: 0,
            particle_count: 0,
        }
    }
}

/// Rolling window of frame times plus the last frame's batch stats
pub struct PerformanceMonitor {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    frame_start: Option<Instant>,
    current_metrics: PerformanceMetrics,
    last_update: Instant,
    update_interval: Duration,
}

impl PerformanceMonitor {
    /// About two seconds of history at 60 fps
    pub const DEFAULT_SAMPLES: usize = 120;

    pub fn new() -> Self {
        Self::with_config(Self::DEFAULT_SAMPLES)
    }

    /// Keeps the last `max_samples` frame times (at least one)
    pub fn with_config(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            frame_start: None,
            current_metrics: PerformanceMetrics::default(),
            last_update: Instant::now(),
            update_interval: Duration::from_millis(100),
        }
    }

    /// Mark the beginning of a frame
    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Mark the end of a frame and update metrics
    pub fn end_frame(&mut self) {
        if let Some(start) = self.frame_start.take() {
            self.add_frame_time(start.elapsed());

            // Averages refresh ten times a second
            if self.last_update.elapsed() >= self.update_interval {
                self.update_metrics();
                self.last_update = Instant::now();
            }
        }
    }

    /// Add a frame time sample
    pub fn add_frame_time(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
    }

    /// Recompute averages from the sample window
    pub fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total_time: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total_time / self.frame_times.len() as u32;
        let avg_frame_time_ms = avg_frame_time.as_secs_f32() * 1000.0;
        
        self.current_metrics.frame_time_ms = avg_frame_time_ms;
        self.current_metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        if let (Some(min_time), Some(max_time)) = (
            self.frame_times.iter().min(),
            self.frame_times.iter().max(),
        ) {
            self.current_metrics.min_frame_time_ms = min_time.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max_time.as_secs_f32() * 1000.0;
        }
    }

    /// Update render statistics
    pub fn update_render_stats(&mut self, draw_calls: u32, vertex_count: u32, particle_count: usize) {
        self.current_metrics.draw_calls = draw_calls;
        self.current_metrics.vertex_count = vertex_count;
        self.current_metrics.particle_count = particle_count;
    }

    /// Get current performance metrics
    pub fn get_metrics(&self) -> &PerformanceMetrics {
        &self.current_metrics
    }

    /// Get frame time history for graphing
    pub fn get_frame_time_history(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }

    /// Reset all metrics and history
    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.current_metrics = PerformanceMetrics::default();
        self.frame_start = None;
        self.last_update = Instant::now();
    }

    /// Render performance metrics UI panel
    pub fn render_ui(&self, ui: &imgui::Ui) {
        let display_size = ui.io().display_size;
        ui.window("Performance Metrics")
            .size([300.0, 260.0], imgui::Condition::FirstUseEver)
            .position([display_size[0] - 320.0, 100.0], imgui::Condition::FirstUseEver)
            .build(|| {
                let metrics = &self.current_metrics;
                
                // FPS and frame time
                ui.text(format!("FPS: {:.1}", metrics.fps));
                ui.same_line();
                ui.text(format!("Frame Time: {:.2}ms", metrics.frame_time_ms));
                
                ui.separator();
                
                // Frame time statistics
                ui.text("Frame Time Stats:");
                ui.text(format!("  Avg: {:.2}ms", metrics.frame_time_ms));
                ui.text(format!("  Min: {:.2}ms", metrics.min_frame_time_ms));
                ui.text(format!("  Max: {:.2}ms", metrics.max_frame_time_ms));
                
                ui.separator();
                
                // Render statistics
                ui.text("Render Stats:");
                ui.text(format!("  Draw Calls: {}", metrics.draw_calls));
                ui.text(format!("  Vertices: {}", metrics.vertex_count));
                ui.text(format!("  Particles: {}", metrics.particle_count));

                // Frame time graph
                if !self.frame_times.is_empty() {
                    ui.separator();
                    ui.text("Frame Time History:");
                    let frame_time_history = self.get_frame_time_history();
                    ui.plot_lines("##frame_times", &frame_time_history)
                        .graph_size([260.0, 60.0])
                        .scale_min(0.0)
                        .scale_max(50.0) // 50ms max for good visibility
                        .build();
                }
            });
    }

    /// Render a compact performance overlay (minimal screen space usage)
    pub fn render_overlay(&self, ui: &imgui::Ui) {
        let display_size = ui.io().display_size;
        let metrics = &self.current_metrics;
        
        ui.window("FPS")
            .size([150.0, 80.0], imgui::Condition::Always)
            .position([display_size[0] - 160.0, 10.0], imgui::Condition::Always)
            .no_decoration()
            .no_inputs()
            .bg_alpha(0.3)
            .build(|| {
                ui.text(format!("FPS: {:.0}", metrics.fps));
                ui.text(format!("{:.1}ms", metrics.frame_time_ms));
                ui.text(format!("{} particles", metrics.particle_count));
            });
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_from_samples() {
        let mut monitor = PerformanceMonitor::with_config(4);
        for ms in [10, 20, 30] {
            monitor.add_frame_time(Duration::from_millis(ms));
        }

        monitor.update_metrics();

        let metrics = monitor.get_metrics();
        assert!((metrics.frame_time_ms - 20.0).abs() < 0.01);
        assert!((metrics.fps - 50.0).abs() < 0.1);
        assert!((metrics.min_frame_time_ms - 10.0).abs() < 0.01);
        assert!((metrics.max_frame_time_ms - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_sample_window_drops_oldest() {
        let mut monitor = PerformanceMonitor::with_config(2);
        for ms in [100, 10, 10] {
            monitor.add_frame_time(Duration::from_millis(ms));
        }

        assert_eq!(monitor.get_frame_time_history().len(), 2);
        monitor.update_metrics();
        assert!((monitor.get_metrics().max_frame_time_ms - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_render_stats_and_reset() {
        let mut monitor = PerformanceMonitor::new();
        monitor.update_render_stats(1, 600, 100);
        assert_eq!(monitor.get_metrics().vertex_count, 600);
        assert_eq!(monitor.get_metrics().particle_count, 100);

        monitor.reset();
        assert_eq!(monitor.get_metrics().draw_calls, 0);
        assert!(monitor.get_frame_time_history().is_empty());
    }

    #[test]
    fn test_default_window_and_minimum_of_one() {
        let mut monitor = PerformanceMonitor::new();
        for _ in 0..PerformanceMonitor::DEFAULT_SAMPLES + 5 {
            monitor.add_frame_time(Duration::from_millis(16));
        }
        assert_eq!(monitor.get_frame_time_history().len(), PerformanceMonitor::DEFAULT_SAMPLES);

        let mut tiny = PerformanceMonitor::with_config(0);
        tiny.add_frame_time(Duration::from_millis(5));
        tiny.add_frame_time(Duration::from_millis(7));
        assert_eq!(tiny.get_frame_time_history(), vec![7.0]);
    }

    #[test]
    fn test_end_without_begin_records_nothing() {
        let mut monitor = PerformanceMonitor::new();
        monitor.end_frame();
        assert!(monitor.get_frame_time_history().is_empty());
    }
}
