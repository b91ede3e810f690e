use verdant_geom::Vec2;
use verdant_scene::{Body, EntityId, Host, Layer};
use verdant_world::palette::AVATAR;
use verdant_world::worldgen::Avatar as AvatarParams;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AvatarInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Only has an effect together with `jump`.
    pub fly: bool,
}

pub struct Avatar {
    id: EntityId,
    params: AvatarParams,
    energy: f32,
    facing_left: bool,
    walking: bool,
}

impl Avatar {
    pub fn spawn<H: Host>(host: &mut H, params: &AvatarParams, block: f32, top_left: Vec2) -> Self {
        let size = Vec2::new(block + block / 3.0, 2.0 * block);
        let mut body = Body::new(top_left, size, AVATAR).dynamic().blocking();
        body.accel = Vec2::new(0.0, params.gravity);
        let id = host.add(body, Layer::Avatar);
        log::info!("avatar spawned at ({:.0}, {:.0})", top_left.x, top_left.y);
        Self {
            id,
            params: *params,
            energy: params.max_energy,
            facing_left: false,
            walking: false,
        }
    }

    /// Turns held input into velocity. Runs once per tick before integration.
    pub fn control<H: Host>(&mut self, host: &mut H, input: AvatarInput) {
        let p = self.params;
        let Some(body) = host.body_mut(self.id) else {
            return;
        };
        let vy = body.vel.y;
        if self.energy < p.max_energy && vy == 0.0 {
            self.energy = (self.energy + p.energy_step).min(p.max_energy);
        }

        let mut vel = Vec2::new(0.0, vy);
        self.walking = false;
        if input.left {
            vel.x -= p.speed;
            self.facing_left = true;
            self.walking = true;
        }
        if input.right {
            vel.x += p.speed;
            self.facing_left = false;
            self.walking = true;
        }
        if input.jump && vy == 0.0 {
            vel.y -= p.jump_speed;
        }
        if input.jump && input.fly && self.energy > 0.0 {
            vel.y -= p.fly_speed;
            self.energy = (self.energy - p.energy_step).max(0.0);
        }
        vel.y = vel.y.clamp(-p.max_rise_speed, p.max_fall_speed);
        body.vel = vel;
    }

    /// Puts the avatar back above the world if it fell through the ground.
    pub fn recover_if_fallen<H: Host>(&mut self, host: &mut H) -> Option<Vec2> {
        let body = host.body_mut(self.id)?;
        let center = body.center();
        if center.y <= self.params.fell_through_y {
            return None;
        }
        let at = Vec2::new(center.x, self.params.respawn_y);
        body.set_center(at);
        body.vel.y = 0.0;
        log::warn!(
            "avatar fell through the ground at x={:.0}; moved back to y={:.0}",
            center.x,
            at.y
        );
        Some(at)
    }

    pub fn center<H: Host>(&self, host: &H) -> Option<Vec2> {
        host.body(self.id).map(|b| b.center())
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn energy(&self) -> f32 {
        self.energy
    }

    #[inline]
    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    #[inline]
    pub fn walking(&self) -> bool {
        self.walking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_scene::Scene;

    fn spawn(scene: &mut Scene) -> Avatar {
        Avatar::spawn(scene, &AvatarParams::default(), 30.0, Vec2::new(0.0, 0.0))
    }

    #[test]
    fn size_follows_block() {
        let mut scene = Scene::new();
        let avatar = spawn(&mut scene);
        assert_eq!(scene.body(avatar.id()).unwrap().size, Vec2::new(40.0, 60.0));
    }

    #[test]
    fn jump_only_from_rest() {
        let mut scene = Scene::new();
        let mut avatar = spawn(&mut scene);
        let jump = AvatarInput {
            jump: true,
            ..AvatarInput::default()
        };
        avatar.control(&mut scene, jump);
        assert_eq!(scene.body(avatar.id()).unwrap().vel.y, -280.0);
        avatar.control(&mut scene, jump);
        assert_eq!(scene.body(avatar.id()).unwrap().vel.y, -280.0);
    }

    #[test]
    fn flying_drains_energy_and_clamps() {
        let mut scene = Scene::new();
        let mut avatar = spawn(&mut scene);
        let fly = AvatarInput {
            jump: true,
            fly: true,
            ..AvatarInput::default()
        };
        avatar.control(&mut scene, fly);
        assert_eq!(scene.body(avatar.id()).unwrap().vel.y, -300.0);
        assert_eq!(avatar.energy(), 99.5);
        for _ in 0..400 {
            avatar.control(&mut scene, fly);
        }
        assert_eq!(avatar.energy(), 0.0);
    }

    #[test]
    fn energy_regenerates_at_rest() {
        let mut scene = Scene::new();
        let mut avatar = spawn(&mut scene);
        let fly = AvatarInput {
            jump: true,
            fly: true,
            ..AvatarInput::default()
        };
        avatar.control(&mut scene, fly);
        avatar.control(&mut scene, fly);
        assert_eq!(avatar.energy(), 99.0);
        scene.body_mut(avatar.id()).unwrap().vel.y = 0.0;
        avatar.control(&mut scene, AvatarInput::default());
        assert_eq!(avatar.energy(), 99.5);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut scene = Scene::new();
        let mut avatar = spawn(&mut scene);
        avatar.control(
            &mut scene,
            AvatarInput {
                left: true,
                right: true,
                ..AvatarInput::default()
            },
        );
        assert_eq!(scene.body(avatar.id()).unwrap().vel.x, 0.0);
        assert!(!avatar.facing_left());
    }

    #[test]
    fn fall_through_moves_back_up() {
        let mut scene = Scene::new();
        let mut avatar = spawn(&mut scene);
        assert!(avatar.recover_if_fallen(&mut scene).is_none());
        {
            let body = scene.body_mut(avatar.id()).unwrap();
            body.set_center(Vec2::new(500.0, 1801.0));
            body.vel = Vec2::new(300.0, 200.0);
        }
        let at = avatar.recover_if_fallen(&mut scene).unwrap();
        assert_eq!(at, Vec2::new(500.0, -1000.0));
        let body = scene.body(avatar.id()).unwrap();
        assert_eq!(body.center(), at);
        assert_eq!(body.vel, Vec2::new(300.0, 0.0));
    }
}
