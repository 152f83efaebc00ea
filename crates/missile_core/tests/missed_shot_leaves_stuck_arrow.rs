use data_runtime::configs::ranged::RangedConfigFile;
use data_runtime::specs::missiles::MissileTypeRegistry;
use glam::Vec3;
use missile_core::lost::LOST_MISSILE_MAX_LIFE_MS;
use missile_core::store::{MissileWorld, ShotKind};
use missile_core::vfx::{NullFx, PropId, SceneProps};

#[derive(Default)]
struct RecordingScene {
    spawned: Vec<(String, Vec3, Vec3)>,
    destroyed: Vec<PropId>,
}

impl SceneProps for RecordingScene {
    fn spawn_prop(&mut self, mesh: &str, pos: Vec3, rot_deg: Vec3) -> Option<PropId> {
        self.spawned.push((mesh.to_string(), pos, rot_deg));
        Some(PropId(self.spawned.len() as u32 - 1))
    }
    fn destroy_prop(&mut self, prop: PropId) {
        self.destroyed.push(prop);
    }
}

fn world() -> MissileWorld {
    let defs = MissileTypeRegistry::parse_str(
        r#"<missiles><missile id="0">
            <mesh>props/arrow_stuck.mesh</mesh><speed>5.0</speed><trace_length>2.0</trace_length>
        </missile></missiles>"#,
    )
    .expect("defs");
    MissileWorld::new(defs, &RangedConfigFile::default())
}

#[test]
fn close_miss_sticks_an_arrow_at_the_end_of_flight_point() {
    let mut w = world();
    let mut fx = NullFx;
    let mut scene = RecordingScene::default();
    let h = w
        .add(0, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.0, ShotKind::Missed, &mut fx)
        .expect("add");

    // Remove mid-flight (covered 5 < cutoff): the arrow lands on the target
    // point, not wherever the missile happened to be.
    w.update(1.0, &mut fx, &mut scene);
    assert!(w.remove(h, &mut fx, &mut scene));

    assert_eq!(scene.spawned.len(), 1);
    let (mesh, pos, rot) = &scene.spawned[0];
    assert_eq!(mesh, "props/arrow_stuck.mesh");
    assert!((*pos - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
    // Flight along +X: flat arrow pointing down-range.
    assert!(rot.length() < 1e-4);
    assert_eq!(w.lost_count(), 1);
}

#[test]
fn stuck_arrow_orientation_follows_the_flight_direction() {
    let mut w = world();
    let mut fx = NullFx;
    let mut scene = RecordingScene::default();
    // 45° dive in the X/Z plane.
    let h = w
        .add(0, Vec3::new(0.0, 0.0, 10.0), Vec3::new(10.0, 0.0, 0.0), 0.0, ShotKind::Missed, &mut fx)
        .expect("add");
    assert!(w.remove(h, &mut fx, &mut scene));

    let (_, _, rot) = &scene.spawned[0];
    assert!((rot.y - 45.0).abs() < 1e-3, "pitch from dir.z, got {rot:?}");
    assert!(rot.z.abs() < 1e-3);
}

#[test]
fn natural_expiry_of_a_close_miss_sticks_an_arrow() {
    let mut w = world();
    let mut fx = NullFx;
    let mut scene = RecordingScene::default();
    w.add(0, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.0, ShotKind::Missed, &mut fx)
        .expect("add");

    // Travel window is (10 + 2) / 5 = 2.4 s; covered 12.5 < 19 at removal.
    w.update(2.5, &mut fx, &mut scene);
    assert_eq!(w.count(), 0);
    assert_eq!(scene.spawned.len(), 1);
    assert!((scene.spawned[0].1 - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-3);
}

#[test]
fn far_miss_and_non_missed_shots_leave_nothing() {
    let mut w = world();
    let mut fx = NullFx;
    let mut scene = RecordingScene::default();

    // Missed, but covered more than the server cutoff by removal time.
    w.add(0, Vec3::ZERO, Vec3::new(30.0, 0.0, 0.0), 0.0, ShotKind::Missed, &mut fx)
        .expect("add");
    w.update(6.5, &mut fx, &mut scene);
    assert_eq!(w.count(), 0);
    assert!(scene.spawned.is_empty());

    // Normal and critical shots never litter.
    for shot in [ShotKind::Normal, ShotKind::Critical] {
        let h = w
            .add(0, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.0, shot, &mut fx)
            .expect("add");
        assert!(w.remove(h, &mut fx, &mut scene));
    }
    assert!(scene.spawned.is_empty());
}

#[test]
fn stuck_arrows_expire_through_the_update_clock() {
    let mut w = world();
    let mut fx = NullFx;
    let mut scene = RecordingScene::default();
    let h = w
        .add(0, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.0, ShotKind::Missed, &mut fx)
        .expect("add");
    w.remove(h, &mut fx, &mut scene);
    assert_eq!(w.lost_count(), 1);

    // Just shy of the lifetime: still stuck.
    let almost = (LOST_MISSILE_MAX_LIFE_MS / 1000) as f32 - 1.0;
    w.update(almost, &mut fx, &mut scene);
    assert_eq!(w.lost_count(), 1);
    assert!(scene.destroyed.is_empty());

    w.update(2.0, &mut fx, &mut scene);
    assert_eq!(w.lost_count(), 0);
    assert_eq!(scene.destroyed, vec![PropId(0)]);
}
