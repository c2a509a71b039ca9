//! 결과 출력.

use std::sync::Mutex;

/// 계산 결과를 사용자에게 보여주는 출력 대상.
pub trait ResultPrinter: Send + Sync {
    fn line(&self, text: &str);
}

/// 표준 출력.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutPrinter;

impl ResultPrinter for StdoutPrinter {
    fn line(&self, text: &str) {
        println!("{}", text);
    }
}

/// 출력된 줄을 메모리에 모으는 프린터. 테스트와 임베딩 용도.
#[derive(Debug, Default)]
pub struct MemoryPrinter {
    lines: Mutex<Vec<String>>,
}

impl MemoryPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl ResultPrinter for MemoryPrinter {
    fn line(&self, text: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(text.to_string());
        }
    }
}
