// 朝食レシピ - 固定の時間付き手順を順に、または待ち時間を重ねて実行する

use crate::core::{OrderId, PipelineError, Recipe};
use anyhow::Result;
use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// この時間（スケール前）を超えると朝食が冷めている
const COLD_AFTER: Duration = Duration::from_secs(20);

/// レシピの1手順
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeStep {
    pub description: &'static str,
    pub duration: Duration,
}

const fn step(description: &'static str, millis: u64) -> RecipeStep {
    RecipeStep {
        description,
        duration: Duration::from_millis(millis),
    }
}

const BACON_STEPS: &[RecipeStep] = &[
    step("grabs bacon", 1000),
    step("sprays pan with oil and turns on stove to medium heat", 2000),
    step("places bacon on pan and lets it cook", 3000),
    step("puts the bacon onto a plate", 1000),
];

const EGG_AND_CHEESE_STEPS: &[RecipeStep] = &[
    step("grabs eggs", 1000),
    step("grabs cheese", 1000),
    step("grabs bread", 1000),
    step("sprays pan with oil and turns on stove to medium heat", 2000),
    step("cracks two eggs onto the pan, adds cheese, and lets it cook", 5000),
    step("puts the eggs onto a plate", 1000),
    step("toasts the bread", 7000),
    step("puts the toast onto a plate", 1000),
];

const BACON_EGG_AND_CHEESE_STEPS: &[RecipeStep] = &[
    step("grabs bacon, eggs, cheese and bread from the fridge", 2000),
    step("sprays pan with oil and turns on stove to medium heat", 3000),
    step("cracks three eggs onto the pan and lets them cook", 5000),
    step("puts the eggs onto a plate", 1000),
    step("places bacon on pan and lets it cook", 3000),
    step("puts the bacon onto a plate", 1000),
    step("toasts the bread", 7000),
    step("puts the toast onto a plate", 1000),
];

/// 前景の手順と並行して進める手順列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideTask {
    /// 前景の手順がこの数だけ終わった時点で開始する
    pub starts_after: usize,
    pub steps: &'static [RecipeStep],
}

/// 待ち時間を重ねて調理する計画（フライパンを温めながら材料を出す、など）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlappedPlan {
    pub foreground: &'static [RecipeStep],
    pub side_tasks: &'static [SideTask],
}

impl OverlappedPlan {
    /// スケール前のクリティカルパス長
    pub fn duration(&self) -> Duration {
        let mut elapsed = Duration::ZERO;
        let mut finish = Duration::ZERO;

        for done in 0..=self.foreground.len() {
            for task in self.side_tasks.iter().filter(|t| t.starts_after == done) {
                let side: Duration = task.steps.iter().map(|s| s.duration).sum();
                finish = finish.max(elapsed + side);
            }
            if let Some(step) = self.foreground.get(done) {
                elapsed += step.duration;
            }
        }

        finish.max(elapsed)
    }
}

const BACON_OVERLAPPED: OverlappedPlan = OverlappedPlan {
    foreground: &[
        step("grabs bacon", 1000),
        step("places bacon on pan and lets it cook", 3000),
        step("puts the bacon onto a plate", 1000),
    ],
    side_tasks: &[SideTask {
        starts_after: 0,
        steps: &[step("sprays pan with oil and turns on stove to medium heat", 2000)],
    }],
};

const EGG_AND_CHEESE_OVERLAPPED: OverlappedPlan = OverlappedPlan {
    foreground: &[
        step("grabs eggs", 1000),
        step("grabs cheese", 1000),
        step("grabs bread", 1000),
        step("cracks two eggs onto the pan, adds cheese, and lets it cook", 5000),
        step("puts the eggs onto a plate", 1000),
    ],
    side_tasks: &[
        SideTask {
            starts_after: 0,
            steps: &[step("sprays pan with oil and turns on stove to medium heat", 2000)],
        },
        SideTask {
            starts_after: 3,
            steps: &[
                step("toasts the bread", 7000),
                step("puts the toast onto a plate", 1000),
            ],
        },
    ],
};

const BACON_EGG_AND_CHEESE_OVERLAPPED: OverlappedPlan = OverlappedPlan {
    foreground: &[
        step("grabs bacon, eggs, cheese and bread from the fridge", 2000),
        step("cracks three eggs onto the pan and lets them cook", 5000),
        step("puts the eggs onto a plate", 1000),
        step("places bacon on pan and lets it cook", 3000),
        step("puts the bacon onto a plate", 1000),
    ],
    side_tasks: &[
        SideTask {
            starts_after: 0,
            steps: &[step("sprays pan with oil and turns on stove to medium heat", 3000)],
        },
        SideTask {
            starts_after: 1,
            steps: &[
                step("toasts the bread", 7000),
                step("puts the toast onto a plate", 1000),
            ],
        },
    ],
};

/// 注文可能な朝食メニュー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakfastMenu {
    Bacon,
    EggAndCheese,
    BaconEggAndCheese,
}

impl BreakfastMenu {
    pub const ALL: [BreakfastMenu; 3] = [
        BreakfastMenu::Bacon,
        BreakfastMenu::EggAndCheese,
        BreakfastMenu::BaconEggAndCheese,
    ];

    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Bacon => "Bacon",
            Self::EggAndCheese => "Egg And Cheese",
            Self::BaconEggAndCheese => "Bacon Egg And Cheese",
        }
    }

    pub const fn steps(&self) -> &'static [RecipeStep] {
        match self {
            Self::Bacon => BACON_STEPS,
            Self::EggAndCheese => EGG_AND_CHEESE_STEPS,
            Self::BaconEggAndCheese => BACON_EGG_AND_CHEESE_STEPS,
        }
    }

    /// スケール前の合計調理時間
    pub fn total_duration(&self) -> Duration {
        self.steps().iter().map(|s| s.duration).sum()
    }

    pub const fn overlapped_plan(&self) -> OverlappedPlan {
        match self {
            Self::Bacon => BACON_OVERLAPPED,
            Self::EggAndCheese => EGG_AND_CHEESE_OVERLAPPED,
            Self::BaconEggAndCheese => BACON_EGG_AND_CHEESE_OVERLAPPED,
        }
    }
}

impl fmt::Display for BreakfastMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for BreakfastMenu {
    type Err = PipelineError;

    /// "Bacon Egg And Cheese" / "bacon-egg-and-cheese" などを受け付ける
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "bacon" => Ok(Self::Bacon),
            "eggandcheese" => Ok(Self::EggAndCheese),
            "baconeggandcheese" => Ok(Self::BaconEggAndCheese),
            _ => Err(PipelineError::configuration(format!(
                "unknown breakfast '{name}' (expected one of: {})",
                Self::ALL.map(|m| m.display_name()).join(", ")
            ))),
        }
    }
}

/// メニューの手順を時間スケール付きで実行するレシピ
#[derive(Debug, Clone)]
pub struct BreakfastRecipe {
    menu: BreakfastMenu,
    time_scale: f64,
    overlapped: bool,
}

impl BreakfastRecipe {
    /// 実時間で調理するレシピ
    pub fn new(menu: BreakfastMenu) -> Self {
        Self {
            menu,
            time_scale: 1.0,
            overlapped: false,
        }
    }

    /// 待ち時間のある手順を別スレッドで並行に進める
    pub fn with_overlapped_steps(mut self) -> Self {
        self.overlapped = true;
        self
    }

    /// 手順時間に掛ける係数（0.001なら1秒の手順が1ミリ秒）
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale.max(0.0);
        self
    }

    pub fn menu(&self) -> BreakfastMenu {
        self.menu
    }

    fn scaled(&self, duration: Duration) -> Duration {
        duration.mul_f64(self.time_scale)
    }

    fn run_steps(&self, cook: &str, order: &str, steps: &[RecipeStep]) {
        for step in steps {
            debug!(cook, order = %order, "> {cook} {}", step.description);
            let pause = self.scaled(step.duration);
            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }
    }

    fn run_overlapped(&self, cook: &str, order: &str) -> Result<()> {
        let plan = self.menu.overlapped_plan();

        // スコープを抜ける時点で並行手順も全て終わっている
        thread::scope(|scope| -> Result<()> {
            for done in 0..=plan.foreground.len() {
                for task in plan.side_tasks.iter().filter(|t| t.starts_after == done) {
                    let _side = thread::Builder::new()
                        .name(format!("{cook}-side"))
                        .spawn_scoped(scope, move || self.run_steps(cook, order, task.steps))?;
                }
                if let Some(step) = plan.foreground.get(done) {
                    self.run_steps(cook, order, std::slice::from_ref(step));
                }
            }
            Ok(())
        })
    }
}

impl Recipe for BreakfastRecipe {
    fn name(&self) -> &str {
        self.menu.display_name()
    }

    fn perform(&self, cook: &str, order: Option<OrderId>) -> Result<()> {
        let started = Instant::now();
        let order = order.map(|id| id.to_string()).unwrap_or_default();

        if self.overlapped {
            self.run_overlapped(cook, &order)?;
        } else {
            self.run_steps(cook, &order, self.menu.steps());
        }

        let elapsed = started.elapsed();
        if elapsed > self.scaled(COLD_AFTER) && self.time_scale > 0.0 {
            warn!(cook, order = %order, elapsed_ms = (elapsed.as_millis() as u64), "breakfast is cold");
        } else {
            info!(cook, order = %order, menu = self.name(), "breakfast is ready");
        }
        Ok(())
    }
}
