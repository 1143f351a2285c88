use rand::Rng;
use serde::Serialize;

use crate::app::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FoodId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WasteId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodKind {
    Apple,
    Bone,
    Fish,
}

impl FoodKind {
    pub const ALL: [FoodKind; 3] = [FoodKind::Apple, FoodKind::Bone, FoodKind::Fish];

    pub fn emoji(self) -> &'static str {
        match self {
            FoodKind::Apple => "🍎",
            FoodKind::Bone => "🦴",
            FoodKind::Fish => "🐟",
        }
    }

    pub(crate) fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodItem {
    pub id: FoodId,
    /// Stage-local pixels.
    pub x: f32,
    pub y: f32,
    pub kind: FoodKind,
    pub collected: bool,
    pub fading: bool,
}

impl FoodItem {
    pub fn is_active(&self) -> bool {
        !self.collected && !self.fading
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteItem {
    pub id: WasteId,
    pub x: f32,
    pub y: f32,
    pub fading: bool,
}

/// A point at least `margin` pixels away from every edge. Stages narrower
/// than twice the margin collapse onto the margin line.
pub(crate) fn random_spawn_point(
    rng: &mut impl Rng,
    stage_size: (f32, f32),
    margin: f32,
) -> Vec2 {
    let (width, height) = stage_size;
    let span_x = (width - margin * 2.0).max(0.0);
    let span_y = (height - margin * 2.0).max(0.0);
    Vec2 {
        x: rng.gen::<f32>() * span_x + margin,
        y: rng.gen::<f32>() * span_y + margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawn_points_stay_inside_margins() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..500 {
            let point = random_spawn_point(&mut rng, (480.0, 360.0), 20.0);
            assert!(point.x >= 20.0 && point.x <= 460.0, "x {}", point.x);
            assert!(point.y >= 20.0 && point.y <= 340.0, "y {}", point.y);
        }
    }

    #[test]
    fn tiny_stage_collapses_to_margin() {
        let mut rng = StdRng::seed_from_u64(1);
        let point = random_spawn_point(&mut rng, (10.0, 10.0), 20.0);
        assert_eq!(point, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn random_kinds_cover_every_food() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = Vec::new();
        for _ in 0..200 {
            let kind = FoodKind::random(&mut rng);
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        assert_eq!(seen.len(), FoodKind::ALL.len());
    }
}
