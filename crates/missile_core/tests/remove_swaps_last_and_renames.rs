use data_runtime::configs::ranged::RangedConfigFile;
use data_runtime::specs::missiles::MissileTypeRegistry;
use glam::Vec3;
use missile_core::store::{MissileWorld, ShotKind};
use missile_core::vfx::{MissileVfx, NullFx};

#[derive(Default)]
struct RecordingVfx {
    added: Vec<(usize, u8)>,
    removed: Vec<usize>,
    renamed: Vec<(usize, usize)>,
}

impl MissileVfx for RecordingVfx {
    fn missile_added(&mut self, index: usize, level: u8, _shot: ShotKind) {
        self.added.push((index, level));
    }
    fn missile_removed(&mut self, index: usize) {
        self.removed.push(index);
    }
    fn missile_renamed(&mut self, from: usize, to: usize) {
        self.renamed.push((from, to));
    }
}

fn world() -> MissileWorld {
    let defs = MissileTypeRegistry::parse_str(
        r#"<missiles><missile id="0">
            <mesh>props/a.mesh</mesh><speed>5.0</speed><trace_length>2.0</trace_length>
        </missile></missiles>"#,
    )
    .expect("defs");
    MissileWorld::new(defs, &RangedConfigFile::default())
}

#[test]
fn remove_moves_the_last_missile_into_the_freed_slot() {
    let mut w = world();
    let mut fx = RecordingVfx::default();
    let mut scene = NullFx;
    for target in [Vec3::X, Vec3::Y, Vec3::Z] {
        w.add(0, Vec3::ZERO, target * 10.0, 0.0, ShotKind::Normal, &mut fx)
            .expect("add");
    }
    assert_eq!(fx.added, vec![(0, 10), (1, 10), (2, 10)]);

    assert!(w.remove(0, &mut fx, &mut scene));
    assert_eq!(w.count(), 2);
    // The old last missile (flying +Z) now answers to handle 0...
    assert!((w.get(0).expect("slot 0").dir - Vec3::Z).length() < 1e-6);
    // ...while the untouched middle missile kept its slot and data.
    assert!((w.get(1).expect("slot 1").dir - Vec3::Y).length() < 1e-6);

    assert_eq!(fx.removed, vec![0]);
    assert_eq!(fx.renamed, vec![(2, 0)]);
}

#[test]
fn removing_the_last_slot_does_not_rename() {
    let mut w = world();
    let mut fx = RecordingVfx::default();
    let mut scene = NullFx;
    for _ in 0..2 {
        w.add(0, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.0, ShotKind::Normal, &mut fx)
            .expect("add");
    }

    assert!(w.remove(1, &mut fx, &mut scene));
    assert_eq!(w.count(), 1);
    assert_eq!(fx.removed, vec![1]);
    assert!(fx.renamed.is_empty());
}

#[test]
fn eye_candy_off_suppresses_add_events_only() {
    let defs = MissileTypeRegistry::parse_str(
        r#"<missiles><missile id="0"><speed>5.0</speed><trace_length>2.0</trace_length></missile></missiles>"#,
    )
    .expect("defs");
    let cfg = RangedConfigFile {
        eye_candy: false,
        ..RangedConfigFile::default()
    };
    let mut w = MissileWorld::new(defs, &cfg);
    let mut fx = RecordingVfx::default();
    let mut scene = NullFx;

    w.add(0, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.0, ShotKind::Normal, &mut fx)
        .expect("add");
    assert!(fx.added.is_empty());
    // Removal bookkeeping still reaches the renderer.
    assert!(w.remove(0, &mut fx, &mut scene));
    assert_eq!(fx.removed, vec![0]);
}

#[test]
fn clear_empties_the_store_without_events() {
    let mut w = world();
    let mut fx = RecordingVfx::default();
    for _ in 0..3 {
        w.add(0, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.0, ShotKind::Normal, &mut fx)
            .expect("add");
    }
    fx.removed.clear();
    w.clear();
    assert_eq!(w.count(), 0);
    assert!(fx.removed.is_empty());
    // The registry survives a clear.
    assert!(w.defs().get(0).is_some());
}
