//! Tunable constants of the gallery.
//!
//! Everything that shapes the room, the camera and the navigation lives in
//! [`GalleryConfig`]. The defaults describe the gallery as it ships; tests and
//! embedders can override single fields with struct update syntax.

/// All constants used by the scene composer and the navigation controller.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryConfig {
    /// Vertical field of view in degrees.
    pub fovy_deg: f32,
    pub znear: f32,
    pub zfar: f32,
    pub camera_start: [f32; 3],
    pub camera_start_target: [f32; 3],

    /// Distance travelled per frame and held walk key.
    pub move_speed: f32,
    /// Seconds a preset jump takes. Zero makes jumps instant.
    pub jump_duration: f32,

    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    /// Half extents of the room along x and z. Walls sit on these planes.
    pub room_half_width: f32,
    pub room_half_depth: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,

    pub frame_depth: f32,
    /// Gap between the front face of a frame and its painting.
    pub painting_offset: f32,
    pub frame_border: f32,

    pub pedestal_size: [f32; 3],
    /// Edge length of the bounding cube every sculpture is fitted into.
    pub sculpture_size: f32,

    pub checker_tiles: u32,
    pub checker_tile_px: u32,
    pub floor_repeat: f32,

    pub clear_colour: [f64; 3],
    pub fog_near: f32,
    pub fog_far: f32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            fovy_deg: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            camera_start: [0.0, 5.0, 10.0],
            camera_start_target: [0.0, 4.0, 0.0],

            move_speed: 0.2,
            jump_duration: 0.8,

            damping_factor: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 1.0,
            min_distance: 2.0,
            max_distance: 40.0,
            min_polar_angle: 0.01,
            max_polar_angle: std::f32::consts::FRAC_PI_2,

            room_half_width: 20.0,
            room_half_depth: 15.0,
            wall_height: 10.0,
            wall_thickness: 0.5,

            frame_depth: 0.2,
            painting_offset: 0.01,
            frame_border: 0.3,

            pedestal_size: [1.5, 1.2, 1.5],
            sculpture_size: 1.5,

            checker_tiles: 8,
            checker_tile_px: 64,
            floor_repeat: 4.0,

            clear_colour: [0.102, 0.102, 0.118],
            fog_near: 20.0,
            fog_far: 90.0,
        }
    }
}
