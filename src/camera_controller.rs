use crate::camera::Camera;
use crate::config::{NavigationSettings, Scale};
use crate::world::Heightfield;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    /// Toward negative z, away from the terrain.
    Up,
    /// Toward positive z, into the terrain.
    Down,
}

impl Movement {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyW => Some(Self::Forward),
            KeyCode::KeyS => Some(Self::Backward),
            KeyCode::KeyA => Some(Self::StrafeLeft),
            KeyCode::KeyD => Some(Self::StrafeRight),
            KeyCode::KeyQ => Some(Self::Up),
            KeyCode::KeyZ => Some(Self::Down),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MovementKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl MovementKeys {
    pub fn set(&mut self, movement: Movement, pressed: bool) {
        let slot = match movement {
            Movement::Forward => &mut self.forward,
            Movement::Backward => &mut self.backward,
            Movement::StrafeLeft => &mut self.left,
            Movement::StrafeRight => &mut self.right,
            Movement::Up => &mut self.up,
            Movement::Down => &mut self.down,
        };
        *slot = pressed;
    }

    // -1, 0 or 1; opposing keys cancel.
    fn axis(negative: bool, positive: bool) -> f32 {
        positive as i32 as f32 - negative as i32 as f32
    }
}

/// Everything one tick of navigation consumes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameInput {
    pub keys: MovementKeys,
    /// Pixels the pointer moved since the previous frame.
    pub mouse_delta: (f32, f32),
    pub elapsed_ms: f32,
}

pub struct CameraController {
    settings: NavigationSettings,
    scale: Scale,
    keys: MovementKeys,
    mouse_delta_x: f32,
    mouse_delta_y: f32,
}

impl CameraController {
    pub fn new(settings: NavigationSettings, scale: Scale) -> Self {
        Self {
            settings,
            scale,
            keys: MovementKeys::default(),
            mouse_delta_x: 0.0,
            mouse_delta_y: 0.0,
        }
    }

    pub fn process_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let PhysicalKey::Code(code) = key_event.physical_key else {
                    return false;
                };
                match Movement::from_key(code) {
                    Some(movement) => {
                        self.press(movement, key_event.state == ElementState::Pressed);
                        true
                    }
                    None => false,
                }
            }
            WindowEvent::Focused(false) => {
                self.keys = MovementKeys::default();
                false
            }
            _ => false,
        }
    }

    pub fn press(&mut self, movement: Movement, pressed: bool) {
        self.keys.set(movement, pressed);
    }

    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        self.mouse_delta_x += delta_x as f32;
        self.mouse_delta_y += delta_y as f32;
    }

    /// Applies the input gathered since the last call, then forgets the mouse delta.
    pub fn update_camera(&mut self, camera: &mut Camera, terrain: &Heightfield, elapsed_ms: f32) {
        let input = FrameInput {
            keys: self.keys,
            mouse_delta: (self.mouse_delta_x, self.mouse_delta_y),
            elapsed_ms,
        };
        *camera = self.step(*camera, &input, terrain);

        self.mouse_delta_x = 0.0;
        self.mouse_delta_y = 0.0;
    }

    /// One navigation tick: mouse look, yaw-relative movement, then the
    /// terrain ceiling on `z`.
    pub fn step(&self, mut camera: Camera, input: &FrameInput, terrain: &Heightfield) -> Camera {
        let (dx, dy) = input.mouse_delta;
        camera.rot_y -= dx * self.settings.mouse_sensitivity;
        camera.rot_x -= dy * self.settings.mouse_sensitivity;

        let distance = self.settings.move_speed * input.elapsed_ms;
        let (sin, cos) = camera.rot_y.sin_cos();
        let keys = input.keys;

        let forwards = MovementKeys::axis(keys.forward, keys.backward);
        if forwards != 0.0 {
            camera.position.x += sin * distance * forwards;
            camera.position.y -= cos * distance * forwards;
        }

        let sideways = MovementKeys::axis(keys.left, keys.right);
        if sideways != 0.0 {
            camera.position.x += cos * distance * sideways;
            camera.position.y += sin * distance * sideways;
        }

        let vertical = MovementKeys::axis(keys.up, keys.down);
        if vertical != 0.0 {
            camera.position.z += distance * vertical;
        }

        if let Some(height) = terrain.height_at(camera.position.x, camera.position.y, self.scale) {
            let ceiling = height * self.scale.z - self.settings.player_height;
            if camera.position.z > ceiling {
                camera.position.z = ceiling;
            }
        }

        camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn controller() -> CameraController {
        CameraController::new(NavigationSettings::default(), Scale::default())
    }

    fn pressed(movements: &[Movement], elapsed_ms: f32) -> FrameInput {
        let mut keys = MovementKeys::default();
        for &movement in movements {
            keys.set(movement, true);
        }
        FrameInput { keys, mouse_delta: (0.0, 0.0), elapsed_ms }
    }

    fn level(position: Vec3) -> Camera {
        Camera::new(position, Vec3::ZERO)
    }

    #[test]
    fn clamp_pins_camera_above_flat_ground() {
        let terrain = Heightfield::flat(17, 0.0);
        let camera = level(Vec3::new(32.0, 32.0, -34.0));
        let next = controller().step(camera, &pressed(&[Movement::Down], 100_000.0), &terrain);
        assert_eq!(next.position.z, -NavigationSettings::default().player_height);
    }

    #[test]
    fn clamp_follows_scaled_terrain() {
        let terrain = Heightfield::flat(3, 0.5);
        let camera = level(Vec3::new(1.0, 1.0, 50.0));
        let next = controller().step(camera, &FrameInput::default(), &terrain);
        assert_eq!(next.position.z, 0.5 * 20.0 - 2.0);
    }

    #[test]
    fn no_floor_outside_footprint() {
        let terrain = Heightfield::flat(17, 0.0);
        let camera = level(Vec3::new(-5.0, -5.0, 0.0));
        let next = controller().step(camera, &pressed(&[Movement::Down], 1000.0), &terrain);
        assert!((next.position.z - 6.0).abs() < 1e-4);
    }

    #[test]
    fn camera_below_ceiling_is_untouched() {
        let terrain = Heightfield::flat(17, 0.0);
        let camera = level(Vec3::new(10.0, 10.0, -34.0));
        let next = controller().step(camera, &FrameInput::default(), &terrain);
        assert_eq!(next, camera);
    }

    #[test]
    fn forward_and_strafe_follow_yaw() {
        let terrain = Heightfield::flat(17, 0.0);
        let camera = level(Vec3::new(10.0, 10.0, -34.0));

        let forward = controller().step(camera, &pressed(&[Movement::Forward], 1000.0), &terrain);
        assert!((forward.position.y - 16.0).abs() < 1e-4);
        assert!((forward.position.x - 10.0).abs() < 1e-4);

        let strafe = controller().step(camera, &pressed(&[Movement::StrafeRight], 1000.0), &terrain);
        assert!((strafe.position.x - 16.0).abs() < 1e-4);
        assert!((strafe.position.y - 10.0).abs() < 1e-4);

        let turned = Camera { rot_y: std::f32::consts::FRAC_PI_2, ..camera };
        let forward = controller().step(turned, &pressed(&[Movement::Forward], 1000.0), &terrain);
        assert!((forward.position.x - 4.0).abs() < 1e-4);
        assert!((forward.position.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn opposing_keys_cancel() {
        let terrain = Heightfield::flat(17, 0.0);
        let camera = level(Vec3::new(10.0, 10.0, -34.0));
        let input = pressed(&[Movement::Forward, Movement::Backward, Movement::Up, Movement::Down], 500.0);
        assert_eq!(controller().step(camera, &input, &terrain), camera);
    }

    #[test]
    fn up_moves_toward_negative_z() {
        let terrain = Heightfield::flat(17, 0.0);
        let camera = level(Vec3::new(10.0, 10.0, -34.0));
        let next = controller().step(camera, &pressed(&[Movement::Up], 1000.0), &terrain);
        assert!((next.position.z + 40.0).abs() < 1e-4);
    }

    #[test]
    fn mouse_delta_turns_camera_once() {
        let terrain = Heightfield::flat(17, 0.0);
        let mut controller = controller();
        let mut camera = level(Vec3::new(10.0, 10.0, -34.0));

        controller.process_mouse_motion(60.0, 40.0);
        controller.process_mouse_motion(40.0, 0.0);
        controller.update_camera(&mut camera, &terrain, 16.0);
        assert!((camera.rot_y + 0.2).abs() < 1e-6);
        assert!((camera.rot_x + 0.08).abs() < 1e-6);

        controller.update_camera(&mut camera, &terrain, 16.0);
        assert!((camera.rot_y + 0.2).abs() < 1e-6);
    }

    #[test]
    fn held_key_keeps_moving() {
        let terrain = Heightfield::flat(17, 0.0);
        let mut controller = controller();
        let mut camera = level(Vec3::new(10.0, 10.0, -34.0));

        controller.press(Movement::Up, true);
        controller.update_camera(&mut camera, &terrain, 500.0);
        controller.update_camera(&mut camera, &terrain, 500.0);
        assert!((camera.position.z + 40.0).abs() < 1e-4);

        controller.press(Movement::Up, false);
        controller.update_camera(&mut camera, &terrain, 500.0);
        assert!((camera.position.z + 40.0).abs() < 1e-4);
    }

    #[test]
    fn key_bindings() {
        assert_eq!(Movement::from_key(KeyCode::KeyW), Some(Movement::Forward));
        assert_eq!(Movement::from_key(KeyCode::KeyQ), Some(Movement::Up));
        assert_eq!(Movement::from_key(KeyCode::KeyZ), Some(Movement::Down));
        assert_eq!(Movement::from_key(KeyCode::Escape), None);
    }
}
