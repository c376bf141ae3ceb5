//! 배율 탐색 뷰 투영기.
//!
//! 카메라 뷰는 화면을 임의 배율로 찍은 것이므로 정규화된 뷰 크기 그대로는
//! 스크린샷에 맞지 않는다 (700x560 뷰 vs 400x300 스크린샷 등).
//! 후보 템플릿 크기를 기하급수 간격으로 만들어 피라미드 하위 레벨에서
//! 거칠게 점수를 매긴 뒤, 상위 후보만 원본 해상도에서 크기/위치를 정밀화한다.
//!
//! 모든 단계가 결정적이다. 동점이면 먼저 만들어진 후보를 유지한다.

use image::{DynamicImage, GrayImage};
use tracing::{debug, warn};
use vcopy_core::error::CoreError;
use vcopy_core::models::raster::MatchResult;
use vcopy_core::ports::locator::ViewLocator;

use crate::locator::{best_offset, Correlation, OffsetWindow, SearchImage, Template, DEFAULT_MATCH_THRESHOLD};
use crate::resize::resize_gray;

/// 피라미드 레벨에서 템플릿 짧은 변의 최소 길이
const COARSE_MIN_SIDE: u32 = 8;

/// 피라미드 최대 축소 배율
const MAX_PYRAMID_FACTOR: u32 = 16;

/// 배율 탐색 파라미터
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSearchConfig {
    /// 최종 채택 임계값
    pub threshold: f32,
    /// 후보 템플릿 최소 변 길이 (스크린샷 픽셀)
    pub min_template_side: u32,
    /// 인접 후보 너비 비율
    pub scale_step: f32,
    /// 뷰 종횡비 대비 허용 배율 (양방향)
    pub aspect_tolerance: f32,
    /// 종횡비 후보 개수 (홀수면 원래 종횡비 포함)
    pub aspect_steps: u32,
    /// 정밀화할 상위 후보 수
    pub refine_candidates: usize,
}

impl Default for ScaleSearchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            min_template_side: 16,
            scale_step: 1.15,
            aspect_tolerance: 1.5,
            aspect_steps: 5,
            refine_candidates: 4,
        }
    }
}

impl ScaleSearchConfig {
    fn aspect_multipliers(&self) -> Vec<f32> {
        let steps = self.aspect_steps.max(1);
        if steps == 1 || self.aspect_tolerance <= 1.0 {
            return vec![1.0];
        }
        let log_tol = self.aspect_tolerance.ln();
        // 원래 종횡비부터 가까운 순서
        let mut multipliers: Vec<f32> = (0..steps)
            .map(|i| {
                let t = i as f32 / (steps - 1) as f32 * 2.0 - 1.0;
                (t * log_tol).exp()
            })
            .collect();
        multipliers.sort_by(|a, b| a.ln().abs().total_cmp(&b.ln().abs()));
        multipliers
    }

    fn aspect_ratio_step(&self) -> f32 {
        let steps = self.aspect_steps.max(2);
        self.aspect_tolerance.max(1.0).powf(2.0 / (steps - 1) as f32)
    }
}

/// 스크린샷 피라미드 (2의 거듭제곱 배율)
struct Pyramid {
    levels: Vec<(u32, SearchImage)>,
}

impl Pyramid {
    fn build(full: &GrayImage) -> Result<Self, CoreError> {
        let mut levels = Vec::new();
        let mut factor = 2;
        while factor <= MAX_PYRAMID_FACTOR {
            let w = full.width() / factor;
            let h = full.height() / factor;
            if w < COARSE_MIN_SIDE || h < COARSE_MIN_SIDE {
                break;
            }
            levels.push((factor, SearchImage::new(&resize_gray(full, w, h)?)));
            factor *= 2;
        }
        Ok(Self { levels })
    }

    /// 템플릿 짧은 변이 `COARSE_MIN_SIDE` 이상 남는 가장 거친 레벨
    fn level_for(&self, width: u32, height: u32) -> Option<(u32, &SearchImage)> {
        let short = width.min(height);
        self.levels
            .iter()
            .rev()
            .find(|(factor, _)| short / factor >= COARSE_MIN_SIDE)
            .map(|(factor, image)| (*factor, image))
    }
}

/// 후보 크기 하나의 거친 탐색 결과 (원본 해상도 좌표로 환산)
#[derive(Debug, Clone, Copy)]
struct Candidate {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    factor: u32,
    score: f32,
}

impl Candidate {
    fn center(&self) -> (i64, i64) {
        (
            self.x as i64 + self.width as i64 / 2,
            self.y as i64 + self.height as i64 / 2,
        )
    }
}

/// 배율 탐색 기반 뷰 위치 탐색기
pub struct ViewProjector {
    config: ScaleSearchConfig,
}

impl ViewProjector {
    pub fn new(config: ScaleSearchConfig) -> Self {
        Self { config }
    }

    /// 기본 파라미터 + 임계값
    pub fn with_threshold(threshold: f32) -> Self {
        Self::new(ScaleSearchConfig {
            threshold,
            ..ScaleSearchConfig::default()
        })
    }

    /// 후보 템플릿 크기 목록 (스크린샷 픽셀)
    ///
    /// 뷰가 그대로 들어가면 원래 크기를 맨 앞에 둔다 (최소 변 길이와 무관).
    fn candidate_sizes(&self, view: (u32, u32), screen: (u32, u32)) -> Vec<(u32, u32)> {
        let (vw, vh) = view;
        let (sw, sh) = screen;
        let min_side = self.config.min_template_side.max(1);
        let aspect = vh as f32 / vw as f32;
        let step = self.config.scale_step.max(1.01);
        let multipliers = self.config.aspect_multipliers();

        let mut sizes = Vec::new();
        if vw <= sw && vh <= sh {
            sizes.push((vw, vh));
        }

        let mut width = sw as f32;
        while width.round() as u32 >= min_side {
            let w = width.round() as u32;
            for m in &multipliers {
                let h = (w as f32 * aspect * m).round() as u32;
                if h >= min_side && h <= sh && !sizes.contains(&(w, h)) {
                    sizes.push((w, h));
                }
            }
            width /= step;
        }
        sizes
    }

    /// 거친 탐색: 후보 크기마다 적절한 피라미드 레벨에서 최고 오프셋
    fn coarse_pass(
        &self,
        view: &GrayImage,
        pyramid: &Pyramid,
        full: &SearchImage,
        sizes: &[(u32, u32)],
    ) -> Result<Vec<Candidate>, CoreError> {
        let mut candidates = Vec::with_capacity(sizes.len());
        for &(w, h) in sizes {
            let (factor, search) = match pyramid.level_for(w, h) {
                Some(level) => level,
                None => (1, full),
            };
            let (tw, th) = ((w / factor).max(1), (h / factor).max(1));
            let template = Template::new(&resize_gray(view, tw, th)?);
            if let Some(best) = best_offset(search, &template, None) {
                candidates.push(Candidate {
                    x: best.x * factor,
                    y: best.y * factor,
                    width: w,
                    height: h,
                    factor,
                    score: best.score,
                });
            }
        }
        Ok(candidates)
    }

    /// 위치가 겹치지 않는 상위 후보 선택
    fn select_distinct(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        // 안정 정렬: 동점이면 생성 순서 유지
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut picked: Vec<Candidate> = Vec::new();
        for candidate in candidates {
            if picked.len() >= self.config.refine_candidates.max(1) {
                break;
            }
            let (cx, cy) = candidate.center();
            let overlaps = picked.iter().any(|p| {
                let (px, py) = p.center();
                let radius = (p.width.min(p.height) / 2) as i64;
                (cx - px).abs() <= radius && (cy - py).abs() <= radius
            });
            if !overlaps {
                picked.push(candidate);
            }
        }
        picked
    }

    /// 주어진 크기의 템플릿을 중심 주변에서 탐색
    fn evaluate(
        &self,
        search: &SearchImage,
        view: &GrayImage,
        size: (u32, u32),
        center: (i64, i64),
        radius: i64,
        min_side: u32,
    ) -> Result<Option<Correlation>, CoreError> {
        let (w, h) = size;
        if w < min_side || h < min_side || w > search.width() || h > search.height() {
            return Ok(None);
        }

        let x0 = center.0 - w as i64 / 2;
        let y0 = center.1 - h as i64 / 2;
        let clamp = |v: i64| -> u32 { v.max(0).min(u32::MAX as i64) as u32 };
        let window = OffsetWindow {
            x_min: clamp(x0 - radius),
            x_max: clamp(x0 + radius),
            y_min: clamp(y0 - radius),
            y_max: clamp(y0 + radius),
        };

        let template = Template::new(&resize_gray(view, w, h)?);
        Ok(best_offset(search, &template, Some(window)))
    }

    /// 정밀화: 크기 격자 탐색 후 간격을 줄이며 언덕 오르기
    ///
    /// 후보 자신의 크기를 가장 먼저 평가하므로 동점이면 원래 크기가 남는다.
    fn refine(
        &self,
        search: &SearchImage,
        view: &GrayImage,
        candidate: &Candidate,
        min_side: u32,
    ) -> Result<Option<Correlation>, CoreError> {
        let radius = candidate.factor as i64 + 2;
        let (w, h) = (candidate.width as i64, candidate.height as i64);

        let width_step_ratio = self.config.scale_step - 1.0;
        let height_step_ratio = width_step_ratio + (self.config.aspect_ratio_step() - 1.0);
        let reach_w = (w as f32 * width_step_ratio).ceil() as i64 + 1;
        let reach_h = (h as f32 * height_step_ratio).ceil() as i64 + 1;
        let grid_w = ((reach_w + 2) / 3).max(1);
        let grid_h = ((reach_h + 2) / 3).max(1);

        let mut best: Option<Correlation> = None;
        let consider = |result: Option<Correlation>, best: &mut Option<Correlation>| {
            if let Some(c) = result {
                if best.map_or(true, |b| c.score > b.score) {
                    *best = Some(c);
                }
            }
        };

        // 1단계: 후보 크기, 그다음 거친 크기 격자
        let center = candidate.center();
        let own = self.evaluate(search, view, (w as u32, h as u32), center, radius, min_side)?;
        consider(own, &mut best);

        let n_w = (reach_w + grid_w - 1) / grid_w;
        let n_h = (reach_h + grid_h - 1) / grid_h;
        for dh in -n_h..=n_h {
            for dw in -n_w..=n_w {
                if dw == 0 && dh == 0 {
                    continue;
                }
                let size = (w + dw * grid_w, h + dh * grid_h);
                if size.0 <= 0 || size.1 <= 0 {
                    continue;
                }
                let size = (size.0 as u32, size.1 as u32);
                let result = self.evaluate(search, view, size, center, radius, min_side)?;
                consider(result, &mut best);
            }
        }

        // 2단계: 간격을 절반씩 줄이며 주변 크기 탐색
        let (mut step_w, mut step_h) = (grid_w, grid_h);
        loop {
            step_w = (step_w / 2).max(1);
            step_h = (step_h / 2).max(1);
            let Some(current) = best else { break };
            let before = current;
            let center = (
                current.x as i64 + current.width as i64 / 2,
                current.y as i64 + current.height as i64 / 2,
            );
            for dh in [-step_h, 0, step_h] {
                for dw in [-step_w, 0, step_w] {
                    if dw == 0 && dh == 0 {
                        continue;
                    }
                    let size = (current.width as i64 + dw, current.height as i64 + dh);
                    if size.0 <= 0 || size.1 <= 0 {
                        continue;
                    }
                    let size = (size.0 as u32, size.1 as u32);
                    let result = self.evaluate(search, view, size, center, 2, min_side)?;
                    consider(result, &mut best);
                }
            }
            let improved = best.map_or(false, |b| b.score > before.score);
            if step_w == 1 && step_h == 1 && !improved {
                break;
            }
        }

        Ok(best)
    }

    /// 임계값과 무관한 최고 점수 매칭 (스크린샷 픽셀 공간)
    pub fn best_match(
        &self,
        view: &DynamicImage,
        screenshot: &DynamicImage,
    ) -> Result<Option<Correlation>, CoreError> {
        let shot = screenshot.to_luma8();
        let mut view_gray = view.to_luma8();
        let (sw, sh) = shot.dimensions();
        let (vw, vh) = view_gray.dimensions();
        if sw == 0 || sh == 0 || vw == 0 || vh == 0 {
            return Ok(None);
        }

        // 모든 후보는 스크린샷 안에 들어가므로 뷰를 미리 줄여 리사이즈 비용을 낮춘다
        if vw > sw || vh > sh {
            let scale = (sw as f64 / vw as f64).min(sh as f64 / vh as f64);
            let pw = ((vw as f64 * scale).round() as u32).max(1);
            let ph = ((vh as f64 * scale).round() as u32).max(1);
            view_gray = resize_gray(&view_gray, pw, ph)?;
        }

        // 원래 크기 그대로 들어가는 작은 뷰는 자기 크기까지 정밀화 허용
        let mut min_side = self.config.min_template_side.max(1);
        if vw <= sw && vh <= sh {
            min_side = min_side.min(vw).min(vh);
        }

        let sizes = self.candidate_sizes((vw, vh), (sw, sh));
        if sizes.is_empty() {
            return Ok(None);
        }

        let full = SearchImage::new(&shot);
        let pyramid = Pyramid::build(&shot)?;
        let candidates = self.coarse_pass(&view_gray, &pyramid, &full, &sizes)?;
        let picked = self.select_distinct(candidates);

        let mut best: Option<Correlation> = None;
        for candidate in &picked {
            if let Some(refined) = self.refine(&full, &view_gray, candidate, min_side)? {
                debug!(
                    coarse_score = candidate.score,
                    score = refined.score,
                    size = %format!("{}x{}", refined.width, refined.height),
                    "후보 정밀화"
                );
                if best.map_or(true, |b| refined.score > b.score) {
                    best = Some(refined);
                }
            }
        }

        Ok(best)
    }
}

impl Default for ViewProjector {
    fn default() -> Self {
        Self::new(ScaleSearchConfig::default())
    }
}

impl ViewLocator for ViewProjector {
    fn locate(&self, view: &DynamicImage, screenshot: &DynamicImage) -> MatchResult {
        match self.best_match(view, screenshot) {
            Ok(Some(best)) if best.score >= self.config.threshold => {
                MatchResult::Found(best.to_point())
            }
            Ok(Some(best)) => {
                debug!(score = best.score, threshold = self.config.threshold, "임계값 미달");
                MatchResult::NotFound
            }
            Ok(None) => MatchResult::NotFound,
            Err(e) => {
                warn!(error = %e, "배율 탐색 실패");
                MatchResult::NotFound
            }
        }
    }

    fn name(&self) -> &str {
        "scale-search"
    }
}
